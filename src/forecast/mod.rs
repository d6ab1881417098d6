//! Daily forecast bucketing
//!
//! Collapses the upstream fixed-interval sample stream (one entry every
//! ~3 hours, up to 5 days) into one representative sample per calendar
//! date. The interval is not assumed anywhere; the selection rule only
//! looks at each sample's hour of day.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};

use crate::models::{Forecast, ForecastDay, RawSample};

/// Collapse an ordered sample stream into one `ForecastDay` per distinct
/// UTC calendar date, ascending by date.
///
/// For each date the sample closest to noon wins. Replacement requires a
/// strictly smaller distance to 12:00, so on a tie the sample processed
/// first keeps its slot.
pub fn aggregate(samples: &[RawSample], city: &str, country: &str) -> Forecast {
    let mut champions: BTreeMap<NaiveDate, &RawSample> = BTreeMap::new();

    for sample in samples {
        let date = sample.timestamp.date_naive();
        match champions.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(sample);
            }
            Entry::Occupied(mut slot) => {
                if noon_distance(sample) < noon_distance(slot.get()) {
                    slot.insert(sample);
                }
            }
        }
    }

    let days = champions
        .into_iter()
        .map(|(date, sample)| ForecastDay {
            date,
            temp: sample.temp,
            temp_min: sample.temp_min,
            temp_max: sample.temp_max,
            condition: sample.condition.clone(),
            description: sample.description.clone(),
            icon: sample.icon.clone(),
            humidity: sample.humidity,
            wind_speed: sample.wind_speed,
            precipitation: sample.precipitation.unwrap_or(0.0),
        })
        .collect();

    Forecast {
        city: city.to_string(),
        country: country.to_string(),
        days,
    }
}

fn noon_distance(sample: &RawSample) -> i64 {
    (sample.timestamp.hour() as i64 - 12).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(day: u32, hour: u32, temp: f64) -> RawSample {
        RawSample {
            timestamp: Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap(),
            temp,
            temp_min: temp - 2.0,
            temp_max: temp + 2.0,
            humidity: 60,
            wind_speed: 4.2,
            condition: "Clouds".to_string(),
            description: "scattered clouds".to_string(),
            icon: "03d".to_string(),
            precipitation: None,
        }
    }

    #[test]
    fn one_bucket_per_distinct_date_ascending() {
        let samples: Vec<RawSample> = (1..=5)
            .flat_map(|day| [0, 6, 12, 18].map(|hour| sample(day, hour, 15.0)))
            .collect();

        let forecast = aggregate(&samples, "London", "GB");

        assert_eq!(forecast.days.len(), 5);
        for pair in forecast.days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn noon_sample_wins_over_all_other_hours() {
        let samples: Vec<RawSample> = [0, 3, 6, 9, 12, 15, 18, 21]
            .iter()
            .map(|&hour| sample(1, hour, hour as f64))
            .collect();

        let forecast = aggregate(&samples, "London", "GB");

        assert_eq!(forecast.days.len(), 1);
        assert_eq!(forecast.days[0].temp, 12.0);
    }

    #[test]
    fn equal_distance_keeps_first_processed_sample() {
        // 09:00 and 15:00 are both three hours from noon; the earlier
        // one was processed first and must not be displaced.
        let samples = vec![sample(1, 9, 9.0), sample(1, 15, 15.0)];

        let forecast = aggregate(&samples, "London", "GB");

        assert_eq!(forecast.days.len(), 1);
        assert_eq!(forecast.days[0].temp, 9.0);
    }

    #[test]
    fn missing_precipitation_defaults_to_zero() {
        let forecast = aggregate(&[sample(1, 12, 20.0)], "London", "GB");
        assert_eq!(forecast.days[0].precipitation, 0.0);
    }

    #[test]
    fn reported_precipitation_is_carried_through() {
        let mut wet = sample(1, 12, 20.0);
        wet.precipitation = Some(1.6);

        let forecast = aggregate(&[wet], "London", "GB");
        assert_eq!(forecast.days[0].precipitation, 1.6);
    }

    #[test]
    fn champion_fields_are_copied_from_the_chosen_sample() {
        let mut noon = sample(2, 12, 21.5);
        noon.condition = "Rain".to_string();
        noon.description = "light rain".to_string();
        noon.icon = "10d".to_string();
        noon.humidity = 88;

        let samples = vec![sample(2, 6, 14.0), noon.clone(), sample(2, 18, 16.0)];
        let forecast = aggregate(&samples, "Paris", "FR");

        let day = &forecast.days[0];
        assert_eq!(day.condition, "Rain");
        assert_eq!(day.description, "light rain");
        assert_eq!(day.icon, "10d");
        assert_eq!(day.humidity, 88);
        assert_eq!(day.temp, 21.5);
    }

    #[test]
    fn empty_input_yields_empty_forecast() {
        let forecast = aggregate(&[], "Nowhere", "");
        assert!(forecast.days.is_empty());
    }
}
