//! Form-submission handling: turns the text input into one fetch-and-render cycle.
//!
//! Every non-blank submission gets a generation number. When a response
//! arrives, it is only rendered if no newer submission has been made since;
//! otherwise it is dropped. The container therefore always ends up showing
//! the most recent query, whichever response lands last.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    Config,
    dom::RenderTarget,
    model::Query,
    provider::{WeatherProvider, provider_from_config},
    render::Renderer,
};

/// The widget's single text input.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    value: Arc<Mutex<String>>,
}

impl InputField {
    pub fn value(&self) -> String {
        lock(&self.value).clone()
    }

    pub fn set(&self, value: impl Into<String>) {
        *lock(&self.value) = value.into();
    }

    pub fn clear(&self) {
        lock(&self.value).clear();
    }
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Rendered,
    /// The fetch failed and the not-found message was rendered.
    RenderedError,
    /// A newer submission was made before this one resolved; nothing rendered.
    Superseded,
    Cancelled,
}

/// Handle to an in-flight submission.
#[derive(Debug)]
pub struct Submission {
    generation: u64,
    handle: JoinHandle<SubmissionOutcome>,
}

impl Submission {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the fetch. The container is left as it was.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub async fn wait(self) -> SubmissionOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => SubmissionOutcome::Cancelled,
        }
    }
}

#[derive(Debug)]
pub struct Widget<T: RenderTarget> {
    provider: Arc<dyn WeatherProvider>,
    target: Arc<Mutex<T>>,
    input: InputField,
    renderer: Renderer,
    default_region: String,
    latest: Arc<AtomicU64>,
}

impl<T: RenderTarget + 'static> Widget<T> {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        target: T,
        renderer: Renderer,
        default_region: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            target: Arc::new(Mutex::new(target)),
            input: InputField::default(),
            renderer,
            default_region: default_region.into(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build a widget backed by the OpenWeather provider described by `config`.
    pub fn from_config(config: &Config, target: T) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        let renderer = Renderer::new(config.display_zone()?);
        Ok(Self::new(provider, target, renderer, config.default_region.as_str()))
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Shared handle to the render target.
    pub fn target(&self) -> Arc<Mutex<T>> {
        Arc::clone(&self.target)
    }

    /// Run `f` against the current render target contents.
    pub fn with_target<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = lock(&self.target);
        f(&guard)
    }

    /// Handle a form submission.
    ///
    /// Blank input is ignored entirely: no request, no render, and the input
    /// keeps its value. Otherwise one fetch is started in the background and
    /// the input is cleared straight away, without waiting for the fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self) -> Option<Submission> {
        let raw = self.input.value();
        let Some(query) = Query::parse(&raw, &self.default_region) else {
            debug!("ignoring blank submission");
            return None;
        };

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let provider = Arc::clone(&self.provider);
        let target = Arc::clone(&self.target);
        let latest = Arc::clone(&self.latest);
        let renderer = self.renderer;

        let handle = tokio::spawn(async move {
            let outcome = provider.fetch_weather(&query).await;

            let mut target = lock(&target);
            if latest.load(Ordering::SeqCst) != generation {
                debug!(q = %query.qualified, generation, "discarding superseded response");
                return SubmissionOutcome::Superseded;
            }

            match outcome {
                Ok(model) => {
                    debug!(q = %query.qualified, place = %model.place, "rendering weather");
                    renderer.render_weather(&mut *target, &model);
                    SubmissionOutcome::Rendered
                }
                Err(err) => {
                    warn!(q = %query.qualified, error = %err, "weather fetch failed");
                    renderer.render_error(&mut *target);
                    SubmissionOutcome::RenderedError
                }
            }
        });

        self.input.clear();

        Some(Submission { generation, handle })
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dom::Container,
        testing::{GAINESVILLE_FIXTURE, StubProvider},
    };

    fn widget(stub: StubProvider) -> (Widget<Container>, Arc<StubProvider>) {
        let stub = Arc::new(stub);
        let w = Widget::new(stub.clone(), Container::default(), Renderer::default(), "us");
        (w, stub)
    }

    #[test]
    fn input_field_set_and_clear() {
        let input = InputField::default();
        input.set("paris");
        assert_eq!(input.value(), "paris");
        input.clear();
        assert_eq!(input.value(), "");
    }

    #[tokio::test]
    async fn blank_submission_keeps_input() {
        let (w, stub) = widget(StubProvider::with_body(GAINESVILLE_FIXTURE));
        w.input().set("   ");

        assert!(w.submit().is_none());
        assert_eq!(w.input().value(), "   ");
        assert!(stub.queries().is_empty());
    }

    #[tokio::test]
    async fn generations_increase_per_submission() {
        let (w, _) = widget(StubProvider::with_body(GAINESVILLE_FIXTURE));

        w.input().set("a");
        let first = w.submit().unwrap();
        w.input().set("b");
        let second = w.submit().unwrap();

        assert_eq!(first.generation() + 1, second.generation());
        assert_eq!(first.wait().await, SubmissionOutcome::Superseded);
        assert_eq!(second.wait().await, SubmissionOutcome::Rendered);
    }

    #[tokio::test]
    async fn cancelled_submission_leaves_container_untouched() {
        let (w, _) = widget(StubProvider::with_body(GAINESVILLE_FIXTURE).pending());
        w.input().set("gainesville");

        let sub = w.submit().unwrap();
        sub.cancel();

        assert_eq!(sub.wait().await, SubmissionOutcome::Cancelled);
        assert!(w.with_target(Container::is_empty));
    }
}
