//! Settlement report ("liquidación") for one professional
//!
//! Pure aggregation over already-selected ledger rows. Per row, the contributing
//! slot is the first match in fixed priority order: prof-1, prof-2, anesthetist.
//! Amounts are bucketed by currency tag (exactly "USD" vs everything else),
//! never converted.

use serde::Serialize;

use super::caja::CajaRow;
use super::profesional::Profesional;

#[derive(Debug, Serialize)]
pub struct LiquidacionEntry {
    pub id: i64,
    /// Rendered `DD/MM/YYYY` for display
    pub fecha: String,
    pub paciente: String,
    pub dni: String,
    pub obra_social: String,
    pub pago_pesos: f64,
    pub pago_dolares: f64,
    pub liq_amount: f64,
    pub liq_currency: String,
}

#[derive(Debug, Serialize)]
pub struct LiquidacionTotales {
    pub liq_pesos: f64,
    pub liq_dolares: f64,
}

#[derive(Debug, Serialize)]
pub struct Liquidacion {
    pub profesional: String,
    pub categoria: String,
    pub entradas: Vec<LiquidacionEntry>,
    pub totales: LiquidacionTotales,
}

impl Liquidacion {
    /// Build the report from rows already filtered to those where `prof`
    /// occupies at least one slot, ordered ascending by date.
    pub fn build(prof: &Profesional, rows: &[CajaRow]) -> Self {
        let mut entradas = Vec::with_capacity(rows.len());
        let mut liq_pesos = 0.0;
        let mut liq_dolares = 0.0;

        for row in rows {
            let (liq_amount, liq_currency) = settlement_for(prof.id, row);

            if liq_currency == "USD" {
                liq_dolares += liq_amount;
            } else {
                liq_pesos += liq_amount;
            }

            entradas.push(LiquidacionEntry {
                id: row.id,
                fecha: row.fecha.format("%d/%m/%Y").to_string(),
                paciente: row.paciente.clone(),
                dni: row.dni.clone(),
                obra_social: row.obra_social.clone().unwrap_or_default(),
                pago_pesos: row.monto_pesos,
                pago_dolares: row.monto_dolares,
                liq_amount,
                liq_currency,
            });
        }

        Self {
            profesional: prof.nombre.clone(),
            categoria: prof.categoria.clone(),
            entradas,
            totales: LiquidacionTotales {
                liq_pesos,
                liq_dolares,
            },
        }
    }
}

/// Settlement (amount, currency) contributed by `prof_id` on this row.
/// First-matching slot wins; if the same professional occupies several slots,
/// the later slots are ignored.
fn settlement_for(prof_id: i64, row: &CajaRow) -> (f64, String) {
    if row.prof_1_id == Some(prof_id) {
        (row.liq_prof_1, row.liq_prof_1_currency.clone())
    } else if row.prof_2_id == Some(prof_id) {
        (row.liq_prof_2, row.liq_prof_2_currency.clone())
    } else if row.anestesista_id == Some(prof_id) {
        (row.liq_anestesista, row.liq_anestesista_currency.clone())
    } else {
        (0.0, "ARS".into())
    }
}
