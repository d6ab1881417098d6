use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::forecast;
use crate::models::{CurrentWeather, Forecast, NewSearchRecord, SearchRecord};
use crate::provider::{OpenWeatherClient, ProviderError};
use crate::stats::{self, StatisticsSnapshot};
use crate::storage::Storage;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub weather: Arc<OpenWeatherClient>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn provider_error(e: ProviderError) -> ApiError {
    tracing::error!("upstream weather request failed: {}", e);
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: "weather source unavailable".to_string(),
        }),
    )
}

fn storage_error(e: anyhow::Error) -> ApiError {
    tracing::error!("storage operation failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[derive(Deserialize)]
pub struct CoordsQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct ForecastRequest {
    pub city: String,
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "5days".to_string()
}

#[derive(Deserialize)]
pub struct StatisticsQuery {
    #[serde(default = "default_stats_limit")]
    pub limit: usize,
}

fn default_stats_limit() -> usize {
    3
}

/// Current conditions for a city
pub async fn current_weather(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let weather = state
        .weather
        .current_weather(&city)
        .await
        .map_err(provider_error)?;
    Ok(Json(weather))
}

/// Current conditions for a coordinate pair
pub async fn current_weather_by_coordinates(
    State(state): State<Arc<AppState>>,
    Query(coords): Query<CoordsQuery>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let weather = state
        .weather
        .current_weather_by_coords(coords.lat, coords.lon)
        .await
        .map_err(provider_error)?;
    Ok(Json(weather))
}

/// Fetch a daily forecast for a city and log the search.
///
/// The persisted record carries the current-weather snapshot for the city,
/// not a forecast-day value, so the history page can show what the weather
/// actually was when the user searched.
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ForecastRequest>,
) -> Result<Json<Forecast>, ApiError> {
    if payload.city.trim().is_empty() {
        return Err(bad_request("city cannot be empty"));
    }

    let samples = state
        .weather
        .forecast_samples(&payload.city)
        .await
        .map_err(provider_error)?;

    let result = forecast::aggregate(&samples.samples, &samples.city, &samples.country);

    let current = state
        .weather
        .current_weather(&payload.city)
        .await
        .map_err(provider_error)?;

    state
        .storage
        .append_search(NewSearchRecord {
            user_id: user.user_id,
            city: current.city,
            country: current.country,
            searched_at: Utc::now().timestamp(),
            condition: current.condition,
            temperature: current.temperature,
            description: current.description,
            period: payload.period,
        })
        .await
        .map_err(storage_error)?;

    Ok(Json(result))
}

/// The caller's full search history, most recent first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SearchRecord>>, ApiError> {
    let records = state
        .storage
        .history_for_user(&user.user_id)
        .await
        .map_err(storage_error)?;

    let ordered = stats::recent_searches(&records, records.len());
    Ok(Json(ordered))
}

/// Aggregated statistics over the caller's search history
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<StatisticsSnapshot>, ApiError> {
    let records = state
        .storage
        .history_for_user(&user.user_id)
        .await
        .map_err(storage_error)?;

    Ok(Json(stats::snapshot(&records, query.limit)))
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
