//! Core library for the weather widget.
//!
//! This crate defines:
//! - Query normalization and the display model
//! - The weather provider abstraction and the OpenWeather client
//! - The render target and the render engine that fills it
//! - The submission handler tying input, fetch and render together
//! - Configuration & credentials handling
//!
//! It is used by `widget-cli`, but any host that can present an element
//! tree can drive it.

pub mod config;
pub mod dom;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod widget;

pub use config::{Config, ProviderSettings};
pub use dom::{Container, Element, RenderTarget};
pub use error::FetchError;
pub use model::{Coordinates, Query, WeatherDisplayModel};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use render::{DisplayZone, Renderer};
pub use widget::{InputField, Submission, SubmissionOutcome, Widget};
