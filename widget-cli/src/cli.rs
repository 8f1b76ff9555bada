use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use widget_core::{Config, Container, DisplayZone, Widget};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Current weather conditions widget")]
pub struct Cli {
    /// Log request and render details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one location and print the widget.
    Show {
        /// Location, e.g. "gainesville" or "Paris, FR".
        query: Vec<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Prompt for locations repeatedly, redrawing the widget after each one.
    Interactive {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Store the API key and display defaults.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// "local", "location", or an IANA zone such as "America/New_York".
    #[arg(long)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { query, view } => {
                let widget = build_widget(&view)?;
                widget.input().set(query.join(" "));

                if let Some(submission) = widget.submit() {
                    submission.wait().await;
                    print_container(&widget, view.format);
                }
            }
            Command::Interactive { view } => {
                let widget = build_widget(&view)?;
                interactive(&widget, view.format, prompt_location).await?;
            }
            Command::Configure => tokio::task::spawn_blocking(configure)
                .await
                .context("Configuration prompt task failed")??,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn build_widget(view: &ViewArgs) -> anyhow::Result<Widget<Container>> {
    let mut config = Config::load()?.with_env_overrides();
    if let Some(tz) = &view.timezone {
        config.timezone = Some(tz.clone());
    }

    debug!(
        region = %config.default_region,
        units = %config.units,
        timezone = config.timezone.as_deref().unwrap_or("local"),
        "building widget"
    );

    Widget::from_config(&config, Container::default())
}

fn prompt_location() -> Result<Option<String>, InquireError> {
    Text::new("Location:")
        .with_help_message("City, or \"City, CC\" for outside the default region. Esc to quit.")
        .prompt_skippable()
}

/// Submit each prompted line until the prompt is skipped or interrupted.
///
/// `prompt` blocks on the terminal, so it runs on the blocking pool.
/// Returns how many submissions were drawn.
async fn interactive<P>(
    widget: &Widget<Container>,
    format: OutputFormat,
    prompt: P,
) -> anyhow::Result<usize>
where
    P: Fn() -> Result<Option<String>, InquireError> + Clone + Send + 'static,
{
    let mut drawn = 0;
    loop {
        let next = prompt.clone();
        let line = tokio::task::spawn_blocking(move || next())
            .await
            .context("Location prompt task failed")?;

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) | Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read location"),
        };

        widget.input().set(line);
        if let Some(submission) = widget.submit() {
            submission.wait().await;
            print_container(widget, format);
            drawn += 1;
        }
    }

    Ok(drawn)
}

/// Runs on a blocking thread; inquire reads the terminal synchronously.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let region = Text::new("Default region code:")
        .with_default(&config.default_region)
        .prompt()
        .context("Failed to read default region")?;

    let current_zone = config.timezone.clone().unwrap_or_else(|| "local".to_string());
    let timezone = Text::new("Timezone for \"Last updated\":")
        .with_default(&current_zone)
        .with_help_message("local, location, or an IANA name like America/New_York")
        .with_validator(|input: &str| {
            Ok(match input.parse::<DisplayZone>() {
                Ok(_) => inquire::validator::Validation::Valid,
                Err(msg) => inquire::validator::Validation::Invalid(msg.into()),
            })
        })
        .prompt()
        .context("Failed to read timezone")?;

    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }
    config.default_region = region.trim().to_lowercase();
    config.timezone = Some(timezone.trim().to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn print_container(widget: &Widget<Container>, format: OutputFormat) {
    let out = widget.with_target(|c| match format {
        OutputFormat::Text => c.to_text(),
        OutputFormat::Html => c.to_html(),
    });
    println!("{out}");
}
