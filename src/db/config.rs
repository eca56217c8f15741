//! Config (admin PIN) and daily-comment storage

use sqlx::SqlitePool;

/// Default admin PIN when the config row is absent.
const DEFAULT_PIN: &str = "1234";

pub async fn get_pin(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT admin_pin FROM app_config WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(pin,)| pin).unwrap_or_else(|| DEFAULT_PIN.into()))
}

pub async fn set_pin(pool: &SqlitePool, pin: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO app_config (id, admin_pin) VALUES (1, ?) \
         ON CONFLICT(id) DO UPDATE SET admin_pin = excluded.admin_pin",
    )
    .bind(pin)
    .execute(pool)
    .await?;
    Ok(())
}

/// Stored comment for a date, or empty string if absent.
pub async fn get_daily_comment(pool: &SqlitePool, fecha: &str) -> Result<String, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT comentario FROM daily_comments WHERE fecha = ?")
            .bind(fecha)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(c,)| c).unwrap_or_default())
}

/// Upsert the comment for a date: created on first write, overwritten after.
pub async fn set_daily_comment(
    pool: &SqlitePool,
    fecha: &str,
    comentario: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO daily_comments (fecha, comentario) VALUES (?, ?) \
         ON CONFLICT(fecha) DO UPDATE SET comentario = excluded.comentario",
    )
    .bind(fecha)
    .bind(comentario)
    .execute(pool)
    .await?;
    Ok(())
}
