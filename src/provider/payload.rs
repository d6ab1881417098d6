//! Upstream payload shapes
//!
//! Serde views of the OpenWeatherMap `/weather` and `/forecast` responses,
//! limited to the fields the service consumes. Required fields are enforced
//! by deserialization, so a payload missing any of them fails the whole
//! request rather than producing a partial result.

use chrono::DateTime;
use serde::Deserialize;

use crate::models::RawSample;
use crate::provider::client::ProviderError;

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub city: CityInfo,
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CityInfo {
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    /// Observation time, seconds since epoch (UTC)
    pub dt: i64,
    pub main: MainReadings,
    pub wind: Wind,
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub rain: Option<Rain>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    pub humidity: i64,
    #[serde(default)]
    pub feels_like: f64,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConditionInfo {
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Precipitation volume, nested and optional upstream. An absent object
/// or an absent volume both mean "no precipitation reported".
#[derive(Debug, Deserialize)]
pub struct Rain {
    #[serde(rename = "3h", default)]
    pub three_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub sys: Sys,
    pub main: MainReadings,
    pub wind: Wind,
    pub weather: Vec<ConditionInfo>,
}

#[derive(Debug, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
}

impl TryFrom<ForecastEntry> for RawSample {
    type Error = ProviderError;

    fn try_from(entry: ForecastEntry) -> Result<Self, Self::Error> {
        let timestamp = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
            ProviderError::Malformed(format!("forecast entry has invalid timestamp {}", entry.dt))
        })?;

        let condition = entry.weather.into_iter().next().ok_or_else(|| {
            ProviderError::Malformed("forecast entry has an empty weather array".to_string())
        })?;

        Ok(RawSample {
            timestamp,
            temp: entry.main.temp,
            temp_min: entry.main.temp_min,
            temp_max: entry.main.temp_max,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition: condition.main,
            description: condition.description,
            icon: condition.icon,
            precipitation: entry.rain.and_then(|rain| rain.three_hour),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(extra: &str) -> String {
        format!(
            r#"{{
                "dt": 1717243200,
                "main": {{ "temp": 18.2, "temp_min": 16.0, "temp_max": 19.5, "humidity": 64 }},
                "wind": {{ "speed": 3.4 }},
                "weather": [{{ "main": "Clouds", "description": "broken clouds", "icon": "04d" }}]
                {extra}
            }}"#
        )
    }

    #[test]
    fn entry_without_rain_parses_with_no_precipitation() {
        let entry: ForecastEntry = serde_json::from_str(&entry_json("")).unwrap();
        let sample = RawSample::try_from(entry).unwrap();
        assert_eq!(sample.precipitation, None);
        assert_eq!(sample.condition, "Clouds");
        assert_eq!(sample.humidity, 64);
    }

    #[test]
    fn entry_with_rain_volume_parses_it() {
        let entry: ForecastEntry =
            serde_json::from_str(&entry_json(r#", "rain": { "3h": 0.85 }"#)).unwrap();
        let sample = RawSample::try_from(entry).unwrap();
        assert_eq!(sample.precipitation, Some(0.85));
    }

    #[test]
    fn rain_object_without_volume_means_none() {
        let entry: ForecastEntry =
            serde_json::from_str(&entry_json(r#", "rain": {}"#)).unwrap();
        let sample = RawSample::try_from(entry).unwrap();
        assert_eq!(sample.precipitation, None);
    }

    #[test]
    fn empty_weather_array_is_rejected() {
        let json = r#"{
            "dt": 1717243200,
            "main": { "temp": 18.2, "humidity": 64 },
            "wind": { "speed": 3.4 },
            "weather": []
        }"#;
        let entry: ForecastEntry = serde_json::from_str(json).unwrap();
        let err = RawSample::try_from(entry).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn missing_timestamp_fails_deserialization() {
        let json = r#"{
            "main": { "temp": 18.2, "humidity": 64 },
            "wind": { "speed": 3.4 },
            "weather": [{ "main": "Clouds" }]
        }"#;
        assert!(serde_json::from_str::<ForecastEntry>(json).is_err());
    }

    #[test]
    fn missing_temperature_fails_deserialization() {
        let json = r#"{
            "dt": 1717243200,
            "main": { "humidity": 64 },
            "wind": { "speed": 3.4 },
            "weather": [{ "main": "Clouds" }]
        }"#;
        assert!(serde_json::from_str::<ForecastEntry>(json).is_err());
    }
}
