//! Professional registry database operations

use sqlx::{Sqlite, SqlitePool};

use crate::error::ApiError;
use crate::models::profesional::Profesional;

pub async fn list(pool: &SqlitePool) -> Result<Vec<Profesional>, ApiError> {
    let profs = sqlx::query_as("SELECT id, nombre, categoria FROM profesionales ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(profs)
}

/// Look up a professional by exact name. Works inside or outside a transaction.
pub async fn find_by_nombre<'e, E>(
    executor: E,
    nombre: &str,
) -> Result<Option<Profesional>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT id, nombre, categoria FROM profesionales WHERE nombre = ?")
        .bind(nombre)
        .fetch_optional(executor)
        .await
}

/// Insert a new professional. A unique-constraint hit on `nombre` is a
/// validation error, not a store failure.
pub async fn create(
    pool: &SqlitePool,
    nombre: &str,
    categoria: &str,
) -> Result<Profesional, ApiError> {
    let result = sqlx::query("INSERT INTO profesionales (nombre, categoria) VALUES (?, ?)")
        .bind(nombre)
        .bind(categoria)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::validation("Ya existe un profesional con ese nombre")
            }
            _ => ApiError::from(e),
        })?;

    Ok(Profesional {
        id: result.last_insert_rowid(),
        nombre: nombre.into(),
        categoria: categoria.into(),
    })
}

/// Delete a professional, nulling out every ledger slot that references it so
/// the financial history survives. One transaction, all-or-nothing.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    for column in ["prof_1_id", "prof_2_id", "anestesista_id"] {
        sqlx::query(&format!(
            "UPDATE caja_diaria SET {column} = NULL WHERE {column} = ?"
        ))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    let result = sqlx::query("DELETE FROM profesionales WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Profesional no encontrado"));
    }

    tx.commit().await?;
    Ok(())
}
