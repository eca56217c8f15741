//! API routes for caja-server

pub mod caja;
pub mod config;
pub mod health;
pub mod liquidacion;
pub mod profesionales;

use axum::Router;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Crate-local `Json` extractor: rejections are rendered with the standard
/// `{"status":"error","message":...}` envelope instead of axum's plain text.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Create the application router. The frontend is served from another origin,
/// so CORS is wide open.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/profesionales",
            get(profesionales::list_profesionales).post(profesionales::create_profesional),
        )
        .route(
            "/profesionales/{id}",
            delete(profesionales::delete_profesional),
        )
        .route("/guardar-caja", post(caja::guardar_caja))
        .route("/caja", get(caja::list_caja))
        .route(
            "/caja/{id}",
            put(caja::update_caja_entry).delete(caja::delete_caja_entry),
        )
        .route("/caja/dia/{fecha}", delete(caja::delete_caja_day))
        .route("/liquidacion/{nombre}", get(liquidacion::get_liquidacion))
        .route(
            "/config/pin",
            get(config::get_pin).post(config::set_pin),
        )
        .route("/daily-comment/{fecha}", get(config::get_daily_comment))
        .route("/daily-comment", post(config::set_daily_comment))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
