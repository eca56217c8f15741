//! Ledger ("caja") models
//!
//! Three independent professional slots per entry (prof-1, prof-2, anesthetist),
//! each with its own settlement amount + currency. Patient payment and co-payment
//! are stored as separate peso/dollar fields, never converted.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Full `caja_diaria` row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CajaRow {
    pub id: i64,
    pub fecha: NaiveDate,
    pub paciente: String,
    pub dni: String,
    pub obra_social: Option<String>,
    pub prof_1_id: Option<i64>,
    pub prof_2_id: Option<i64>,
    pub anestesista_id: Option<i64>,
    pub monto_pesos: f64,
    pub monto_dolares: f64,
    pub liq_prof_1: f64,
    pub liq_prof_1_currency: String,
    pub liq_prof_2: f64,
    pub liq_prof_2_currency: String,
    pub liq_anestesista: f64,
    pub liq_anestesista_currency: String,
    pub coat_pesos: f64,
    pub coat_dolares: f64,
    pub comentario: Option<String>,
}

/// Ledger row as returned by `GET /caja`: slot ids are resolved back to
/// professional names (empty string when the slot is null or dangling).
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CajaHistoryRow {
    pub id: i64,
    pub fecha: NaiveDate,
    pub paciente: String,
    pub dni: String,
    pub obra_social: Option<String>,
    pub prof_1: String,
    pub prof_2: String,
    pub anestesista: String,
    pub pesos: f64,
    pub dolares: f64,
    pub liq_prof_1: f64,
    pub liq_prof_1_currency: String,
    pub liq_prof_2: f64,
    pub liq_prof_2_currency: String,
    pub liq_anestesista: f64,
    pub liq_anestesista_currency: String,
    pub coat_pesos: f64,
    pub coat_dolares: f64,
    pub comentario: Option<String>,
}

/// One entry of a `POST /guardar-caja` batch. Professional slots arrive as
/// names; unresolved names map to a null slot, never an error.
#[derive(Debug, Deserialize)]
pub struct CajaEntryInput {
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub paciente: Option<String>,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub obra_social: Option<String>,
    #[serde(default)]
    pub prof_1: Option<String>,
    #[serde(default)]
    pub prof_2: Option<String>,
    #[serde(default)]
    pub anestesista: Option<String>,
    #[serde(default)]
    pub pesos: Option<f64>,
    #[serde(default)]
    pub dolares: Option<f64>,
    #[serde(default)]
    pub liq_prof_1: Option<f64>,
    #[serde(default)]
    pub liq_prof_1_currency: Option<String>,
    #[serde(default)]
    pub liq_prof_2: Option<f64>,
    #[serde(default)]
    pub liq_prof_2_currency: Option<String>,
    #[serde(default)]
    pub liq_anestesista: Option<f64>,
    #[serde(default)]
    pub liq_anestesista_currency: Option<String>,
    #[serde(default)]
    pub coat_pesos: Option<f64>,
    #[serde(default)]
    pub coat_dolares: Option<f64>,
    #[serde(default)]
    pub comentario: Option<String>,
}

/// Partial update for `PUT /caja/{id}`. Only fields present in the JSON body
/// are applied. The three slot fields distinguish absent (untouched) from
/// present-but-null (slot cleared), hence the double `Option`.
#[derive(Debug, Deserialize)]
pub struct CajaUpdate {
    pub fecha: Option<String>,
    pub paciente: Option<String>,
    pub dni: Option<String>,
    pub obra_social: Option<String>,
    #[serde(default, deserialize_with = "some_or_null")]
    pub prof_1: Option<Option<String>>,
    #[serde(default, deserialize_with = "some_or_null")]
    pub prof_2: Option<Option<String>>,
    #[serde(default, deserialize_with = "some_or_null")]
    pub anestesista: Option<Option<String>>,
    pub pesos: Option<f64>,
    pub dolares: Option<f64>,
    pub liq_prof_1: Option<f64>,
    pub liq_prof_1_currency: Option<String>,
    pub liq_prof_2: Option<f64>,
    pub liq_prof_2_currency: Option<String>,
    pub liq_anestesista: Option<f64>,
    pub liq_anestesista_currency: Option<String>,
    pub coat_pesos: Option<f64>,
    pub coat_dolares: Option<f64>,
    pub comentario: Option<String>,
}

/// Deserialize a field so that an explicit JSON `null` becomes `Some(None)`
/// while an absent field stays `None` (via `#[serde(default)]`).
fn some_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
