//! Ledger ("caja") database operations

use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::ApiError;
use crate::models::caja::{CajaEntryInput, CajaHistoryRow, CajaRow, CajaUpdate};

use super::profesionales;

/// Comment text that marks a row as a manual-settlement artifact.
const MANUAL_COMMENT: &str = "Liquidación Manual";
/// Patient-name substring that marks a row as a manual-settlement artifact.
const MANUAL_PATIENT_TAG: &str = "(Liq. Manual)";

/// Listing filters for `GET /caja`. An exact date takes precedence over the
/// range; either range bound may be given alone.
#[derive(Debug, Default)]
pub struct CajaFilter {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub include_manual: bool,
}

pub(crate) fn parse_fecha(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Fecha inválida: {s}")))
}

/// Resolve a professional slot by name. Empty or unresolved names map to a
/// null slot; this leniency is part of the API contract.
async fn resolve_slot(
    tx: &mut sqlx::SqliteConnection,
    nombre: Option<&str>,
) -> Result<Option<i64>, sqlx::Error> {
    let Some(nombre) = nombre.filter(|n| !n.trim().is_empty()) else {
        return Ok(None);
    };
    let prof = profesionales::find_by_nombre(&mut *tx, nombre).await?;
    Ok(prof.map(|p| p.id))
}

/// Insert a batch of ledger rows inside one transaction (all-or-nothing).
/// Always inserts, never upserts. Returns the number of rows created.
pub async fn create_batch(
    pool: &SqlitePool,
    entries: &[CajaEntryInput],
) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        let fecha = match entry.fecha.as_deref().filter(|f| !f.is_empty()) {
            Some(f) => parse_fecha(f)?,
            None => Utc::now().date_naive(),
        };

        let prof_1_id = resolve_slot(&mut tx, entry.prof_1.as_deref()).await?;
        let prof_2_id = resolve_slot(&mut tx, entry.prof_2.as_deref()).await?;
        let anestesista_id = resolve_slot(&mut tx, entry.anestesista.as_deref()).await?;

        sqlx::query(
            r#"
            INSERT INTO caja_diaria (
                fecha, paciente, dni, obra_social,
                prof_1_id, prof_2_id, anestesista_id,
                monto_pesos, monto_dolares,
                liq_prof_1, liq_prof_1_currency,
                liq_prof_2, liq_prof_2_currency,
                liq_anestesista, liq_anestesista_currency,
                coat_pesos, coat_dolares, comentario
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(fecha)
        .bind(entry.paciente.as_deref().unwrap_or(""))
        .bind(entry.dni.as_deref().unwrap_or(""))
        .bind(entry.obra_social.as_deref().unwrap_or(""))
        .bind(prof_1_id)
        .bind(prof_2_id)
        .bind(anestesista_id)
        .bind(entry.pesos.unwrap_or(0.0))
        .bind(entry.dolares.unwrap_or(0.0))
        .bind(entry.liq_prof_1.unwrap_or(0.0))
        .bind(entry.liq_prof_1_currency.as_deref().unwrap_or("ARS"))
        .bind(entry.liq_prof_2.unwrap_or(0.0))
        .bind(entry.liq_prof_2_currency.as_deref().unwrap_or("ARS"))
        .bind(entry.liq_anestesista.unwrap_or(0.0))
        .bind(entry.liq_anestesista_currency.as_deref().unwrap_or("ARS"))
        .bind(entry.coat_pesos.unwrap_or(0.0))
        .bind(entry.coat_dolares.unwrap_or(0.0))
        .bind(entry.comentario.as_deref().unwrap_or(""))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(entries.len() as u64)
}

/// Filtered history listing, most recent first (date desc, then id desc).
/// Manual-settlement rows are hidden unless `include_manual` is set.
pub async fn list(pool: &SqlitePool, filter: &CajaFilter) -> Result<Vec<CajaHistoryRow>, ApiError> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT c.id, c.fecha, c.paciente, c.dni, c.obra_social, \
                COALESCE(p1.nombre, '') AS prof_1, \
                COALESCE(p2.nombre, '') AS prof_2, \
                COALESCE(pa.nombre, '') AS anestesista, \
                c.monto_pesos AS pesos, c.monto_dolares AS dolares, \
                c.liq_prof_1, c.liq_prof_1_currency, \
                c.liq_prof_2, c.liq_prof_2_currency, \
                c.liq_anestesista, c.liq_anestesista_currency, \
                c.coat_pesos, c.coat_dolares, c.comentario \
         FROM caja_diaria c \
         LEFT JOIN profesionales p1 ON p1.id = c.prof_1_id \
         LEFT JOIN profesionales p2 ON p2.id = c.prof_2_id \
         LEFT JOIN profesionales pa ON pa.id = c.anestesista_id \
         WHERE 1 = 1",
    );

    if let Some(date) = filter.date {
        qb.push(" AND c.fecha = ").push_bind(date);
    } else {
        if let Some(start) = filter.start_date {
            qb.push(" AND c.fecha >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND c.fecha <= ").push_bind(end);
        }
    }

    if !filter.include_manual {
        qb.push(" AND (c.comentario IS NULL OR c.comentario <> ")
            .push_bind(MANUAL_COMMENT)
            .push(")");
        qb.push(" AND c.paciente NOT LIKE ")
            .push_bind(format!("%{MANUAL_PATIENT_TAG}%"));
    }

    qb.push(" ORDER BY c.fecha DESC, c.id DESC");

    let rows = qb.build_query_as::<CajaHistoryRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Partial update of one ledger row. Only fields carried by the patch are
/// applied; slot names resolve like on create, except an unresolvable
/// non-empty name leaves the slot unchanged.
pub async fn update(pool: &SqlitePool, id: i64, patch: &CajaUpdate) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let Some(mut row) =
        sqlx::query_as::<_, CajaRow>("SELECT * FROM caja_diaria WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
    else {
        return Err(ApiError::not_found("Entrada no encontrada"));
    };

    if let Some(fecha) = patch.fecha.as_deref() {
        row.fecha = parse_fecha(fecha)?;
    }
    if let Some(v) = &patch.paciente {
        row.paciente = v.clone();
    }
    if let Some(v) = &patch.dni {
        row.dni = v.clone();
    }
    if let Some(v) = &patch.obra_social {
        row.obra_social = Some(v.clone());
    }
    if let Some(v) = patch.pesos {
        row.monto_pesos = v;
    }
    if let Some(v) = patch.dolares {
        row.monto_dolares = v;
    }
    if let Some(v) = patch.liq_prof_1 {
        row.liq_prof_1 = v;
    }
    if let Some(v) = &patch.liq_prof_1_currency {
        row.liq_prof_1_currency = v.clone();
    }
    if let Some(v) = patch.liq_prof_2 {
        row.liq_prof_2 = v;
    }
    if let Some(v) = &patch.liq_prof_2_currency {
        row.liq_prof_2_currency = v.clone();
    }
    if let Some(v) = patch.liq_anestesista {
        row.liq_anestesista = v;
    }
    if let Some(v) = &patch.liq_anestesista_currency {
        row.liq_anestesista_currency = v.clone();
    }
    if let Some(v) = patch.coat_pesos {
        row.coat_pesos = v;
    }
    if let Some(v) = patch.coat_dolares {
        row.coat_dolares = v;
    }
    if let Some(v) = &patch.comentario {
        row.comentario = Some(v.clone());
    }

    apply_slot_patch(&mut tx, &patch.prof_1, &mut row.prof_1_id).await?;
    apply_slot_patch(&mut tx, &patch.prof_2, &mut row.prof_2_id).await?;
    apply_slot_patch(&mut tx, &patch.anestesista, &mut row.anestesista_id).await?;

    sqlx::query(
        r#"
        UPDATE caja_diaria SET
            fecha = ?, paciente = ?, dni = ?, obra_social = ?,
            prof_1_id = ?, prof_2_id = ?, anestesista_id = ?,
            monto_pesos = ?, monto_dolares = ?,
            liq_prof_1 = ?, liq_prof_1_currency = ?,
            liq_prof_2 = ?, liq_prof_2_currency = ?,
            liq_anestesista = ?, liq_anestesista_currency = ?,
            coat_pesos = ?, coat_dolares = ?, comentario = ?
        WHERE id = ?
        "#,
    )
    .bind(row.fecha)
    .bind(&row.paciente)
    .bind(&row.dni)
    .bind(&row.obra_social)
    .bind(row.prof_1_id)
    .bind(row.prof_2_id)
    .bind(row.anestesista_id)
    .bind(row.monto_pesos)
    .bind(row.monto_dolares)
    .bind(row.liq_prof_1)
    .bind(&row.liq_prof_1_currency)
    .bind(row.liq_prof_2)
    .bind(&row.liq_prof_2_currency)
    .bind(row.liq_anestesista)
    .bind(&row.liq_anestesista_currency)
    .bind(row.coat_pesos)
    .bind(row.coat_dolares)
    .bind(&row.comentario)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Slot semantics on update: absent → untouched, null/empty → cleared,
/// unresolvable non-empty name → unchanged (silently ignored).
async fn apply_slot_patch(
    tx: &mut sqlx::SqliteConnection,
    patch: &Option<Option<String>>,
    slot: &mut Option<i64>,
) -> Result<(), sqlx::Error> {
    match patch {
        None => {}
        Some(None) => *slot = None,
        Some(Some(nombre)) if nombre.trim().is_empty() => *slot = None,
        Some(Some(nombre)) => {
            if let Some(prof) = profesionales::find_by_nombre(&mut *tx, nombre).await? {
                *slot = Some(prof.id);
            }
        }
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM caja_diaria WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Entrada no encontrada"));
    }
    Ok(())
}

/// Bulk-delete every ledger row for one date together with that day's comment.
/// One transaction; returns the number of ledger rows removed.
pub async fn delete_day(pool: &SqlitePool, fecha: NaiveDate) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM caja_diaria WHERE fecha = ?")
        .bind(fecha)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM daily_comments WHERE fecha = ?")
        .bind(fecha.format("%Y-%m-%d").to_string())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}
