//! Ledger CRUD endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::Json;
use crate::db;
use crate::db::caja::CajaFilter;
use crate::error::ApiError;
use crate::models::caja::{CajaEntryInput, CajaHistoryRow, CajaUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GuardarCajaRequest {
    #[serde(default)]
    pub entries: Vec<CajaEntryInput>,
}

pub async fn guardar_caja(
    State(state): State<AppState>,
    Json(body): Json<GuardarCajaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let count = db::caja::create_batch(&state.pool, &body.entries).await?;
    tracing::info!(count, "caja batch saved");
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "message": "Caja guardada correctamente"})),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CajaQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_manual: Option<String>,
}

/// Query-string dates that fail to parse are ignored, matching the lenient
/// behavior callers already depend on.
fn parse_date_param(param: Option<&str>) -> Option<NaiveDate> {
    param.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

pub async fn list_caja(
    State(state): State<AppState>,
    Query(query): Query<CajaQuery>,
) -> Result<Json<Vec<CajaHistoryRow>>, ApiError> {
    let filter = CajaFilter {
        date: parse_date_param(query.date.as_deref()),
        start_date: parse_date_param(query.start_date.as_deref()),
        end_date: parse_date_param(query.end_date.as_deref()),
        include_manual: query.include_manual.as_deref().is_some_and(|v| !v.is_empty()),
    };
    let rows = db::caja::list(&state.pool, &filter).await?;
    Ok(Json(rows))
}

pub async fn update_caja_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<CajaUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db::caja::update(&state.pool, id, &patch).await?;
    Ok(Json(
        json!({"status": "success", "message": "Entrada actualizada"}),
    ))
}

pub async fn delete_caja_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db::caja::delete(&state.pool, id).await?;
    Ok(Json(
        json!({"status": "success", "message": "Entrada eliminada"}),
    ))
}

pub async fn delete_caja_day(
    State(state): State<AppState>,
    Path(fecha): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let fecha = NaiveDate::parse_from_str(&fecha, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Fecha inválida: {fecha}")))?;
    let deleted = db::caja::delete_day(&state.pool, fecha).await?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("Día eliminado ({deleted} entradas)"),
    })))
}
