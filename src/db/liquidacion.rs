//! Settlement report queries

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::ApiError;
use crate::models::caja::CajaRow;

/// Every ledger row where the professional occupies any of the three slots,
/// optionally bounded by an inclusive date range, ascending by date (ties by
/// insertion order).
pub async fn rows_for_profesional(
    pool: &SqlitePool,
    prof_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<CajaRow>, ApiError> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT * FROM caja_diaria WHERE (prof_1_id = ",
    );
    qb.push_bind(prof_id)
        .push(" OR prof_2_id = ")
        .push_bind(prof_id)
        .push(" OR anestesista_id = ")
        .push_bind(prof_id)
        .push(")");

    if let Some(start) = start_date {
        qb.push(" AND fecha >= ").push_bind(start);
    }
    if let Some(end) = end_date {
        qb.push(" AND fecha <= ").push_bind(end);
    }

    qb.push(" ORDER BY fecha ASC, id ASC");

    let rows = qb.build_query_as::<CajaRow>().fetch_all(pool).await?;
    Ok(rows)
}
