//! Settlement report endpoint

use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::Json;
use crate::db;
use crate::error::ApiError;
use crate::models::liquidacion::Liquidacion;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LiquidacionQuery {
    /// Accepted for wire compatibility with older clients; the report always
    /// derives the slot from the row itself.
    #[allow(dead_code)]
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_bound(param: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match param.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::validation(format!("Fecha inválida: {s}"))),
    }
}

pub async fn get_liquidacion(
    State(state): State<AppState>,
    Path(nombre): Path<String>,
    Query(query): Query<LiquidacionQuery>,
) -> Result<Json<Liquidacion>, ApiError> {
    let Some(prof) = db::profesionales::find_by_nombre(&state.pool, &nombre).await? else {
        return Err(ApiError::not_found("Profesional no encontrado"));
    };

    let start = parse_bound(query.start_date.as_deref())?;
    let end = parse_bound(query.end_date.as_deref())?;

    let rows = db::liquidacion::rows_for_profesional(&state.pool, prof.id, start, end).await?;
    Ok(Json(Liquidacion::build(&prof, &rows)))
}
