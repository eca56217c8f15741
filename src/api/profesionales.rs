//! Professional registry endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use super::Json;
use crate::db;
use crate::error::ApiError;
use crate::models::profesional::{Profesional, ProfesionalCreate};
use crate::state::AppState;

pub async fn list_profesionales(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profesional>>, ApiError> {
    let profs = db::profesionales::list(&state.pool).await?;
    Ok(Json(profs))
}

pub async fn create_profesional(
    State(state): State<AppState>,
    Json(body): Json<ProfesionalCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let nombre = body.nombre.as_deref().unwrap_or("").trim().to_owned();
    if nombre.is_empty() {
        return Err(ApiError::validation("Falta el nombre del profesional"));
    }
    let categoria = body
        .categoria
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "ORL".into());

    let prof = db::profesionales::create(&state.pool, &nombre, &categoria).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "id": prof.id, "nombre": prof.nombre})),
    ))
}

pub async fn delete_profesional(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db::profesionales::delete(&state.pool, id).await?;
    Ok(Json(
        json!({"status": "success", "message": "Profesional eliminado"}),
    ))
}
