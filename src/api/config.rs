//! Admin PIN and daily-comment endpoints

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::json;

use super::Json;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_pin(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let pin = db::config::get_pin(&state.pool).await?;
    Ok(Json(json!({"pin": pin})))
}

#[derive(Debug, Deserialize)]
pub struct SetPinRequest {
    #[serde(default)]
    pub pin: Option<String>,
}

pub async fn set_pin(
    State(state): State<AppState>,
    Json(body): Json<SetPinRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pin = body.pin.as_deref().unwrap_or("").trim().to_owned();
    if pin.is_empty() {
        return Err(ApiError::validation("Falta el PIN"));
    }
    db::config::set_pin(&state.pool, &pin).await?;
    Ok(Json(json!({"message": "PIN actualizado"})))
}

pub async fn get_daily_comment(
    State(state): State<AppState>,
    Path(fecha): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let comment = db::config::get_daily_comment(&state.pool, &fecha).await?;
    Ok(Json(json!({"comment": comment})))
}

#[derive(Debug, Deserialize)]
pub struct SetDailyCommentRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

pub async fn set_daily_comment(
    State(state): State<AppState>,
    Json(body): Json<SetDailyCommentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(date) = body.date.filter(|d| !d.is_empty()) else {
        return Err(ApiError::validation("Falta fecha"));
    };
    let comment = body.comment.unwrap_or_default();
    db::config::set_daily_comment(&state.pool, &date, &comment).await?;
    Ok(Json(json!({"message": "Comentario guardado"})))
}
