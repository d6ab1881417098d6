use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::auth::{auth_middleware, AuthService};
use crate::config::FrontendConfig;
use crate::provider::OpenWeatherClient;
use crate::storage::Storage;

use super::auth_handlers::{login, register, AuthState};
use super::handlers::{
    current_weather, current_weather_by_coordinates, get_forecast, get_history, get_statistics,
    health_check, AppState,
};

pub fn create_api_router(
    storage: Arc<dyn Storage>,
    weather: Arc<OpenWeatherClient>,
    auth_service: Arc<AuthService>,
    frontend: FrontendConfig,
) -> Router {
    let state = Arc::new(AppState {
        storage: Arc::clone(&storage),
        weather,
    });
    let auth_state = Arc::new(AuthState {
        storage,
        auth_service: Arc::clone(&auth_service),
    });

    let protected_routes = Router::new()
        .route("/api/weather/current/coordinates", get(current_weather_by_coordinates))
        .route("/api/weather/current/{city}", get(current_weather))
        .route("/api/weather/forecast", post(get_forecast))
        .route("/api/weather/history", get(get_history))
        .route("/api/weather/statistics", get(get_statistics))
        .route_layer(middleware::from_fn(
            move |headers: HeaderMap, req: Request, next: Next| {
                let auth = Arc::clone(&auth_service);
                auth_middleware(auth, headers, req, next)
            },
        ))
        .with_state(state);

    let auth_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .with_state(auth_state);

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .merge(auth_routes)
        .layer(CorsLayer::permissive());

    if let Some(static_dir) = frontend.static_dir {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
}
