//! OpenWeatherMap client
//!
//! Thin reqwest wrapper over the upstream `/weather` and `/forecast`
//! endpoints. A non-success upstream status is surfaced as a single
//! terminal `Unavailable` error; there is no retry here.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;

use crate::config::OpenWeatherConfig;
use crate::models::{CurrentWeather, RawSample};
use crate::provider::payload::{CurrentResponse, ForecastResponse};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("weather source unavailable (status {0})")]
    Unavailable(u16),
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// The forecast payload reduced to validated samples, still in upstream
/// chronological order. Bucketing happens in `forecast::aggregate`.
#[derive(Debug, Clone)]
pub struct ForecastSamples {
    pub city: String,
    pub country: String,
    pub samples: Vec<RawSample>,
}

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(config: &OpenWeatherConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, ProviderError> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        self.parse_current(response).await
    }

    pub async fn current_weather_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentWeather, ProviderError> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        self.parse_current(response).await
    }

    /// Fetch the multi-day forecast sample stream for a city.
    ///
    /// Every list entry must parse into a valid `RawSample`; a single
    /// malformed entry fails the whole request so a silently missing day
    /// can never corrupt the one-bucket-per-date output.
    pub async fn forecast_samples(&self, city: &str) -> Result<ForecastSamples, ProviderError> {
        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: ForecastResponse = serde_json::from_str(&body)?;

        let samples = parsed
            .list
            .into_iter()
            .map(RawSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastSamples {
            city: parsed.city.name,
            country: parsed.city.country,
            samples,
        })
    }

    async fn parse_current(
        &self,
        response: reqwest::Response,
    ) -> Result<CurrentWeather, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: CurrentResponse = serde_json::from_str(&body)?;

        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            ProviderError::Malformed("current weather has an empty weather array".to_string())
        })?;

        Ok(CurrentWeather {
            city: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            condition: condition.main,
            description: condition.description,
            icon: condition.icon,
            observed_at: Utc::now().timestamp(),
        })
    }
}
