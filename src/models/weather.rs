use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One validated upstream forecast observation.
///
/// Constructed once per upstream list entry and discarded after daily
/// bucketing. `precipitation` stays optional so that "not reported" and
/// "reported as zero" remain distinguishable until output time.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub precipitation: Option<f64>,
}

/// The representative sample chosen for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub humidity: i64,
    pub wind_speed: f64,
    pub precipitation: f64,
}

/// Daily forecast for a city, one entry per calendar date, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub days: Vec<ForecastDay>,
}

/// Current conditions for a city, as reported by the upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    /// Unix timestamp of when the observation was fetched
    pub observed_at: i64,
}
