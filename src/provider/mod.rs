pub mod client;
pub mod payload;

pub use client::{ForecastSamples, OpenWeatherClient, ProviderError};
