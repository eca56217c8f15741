//! Database access layer

pub mod caja;
pub mod config;
pub mod liquidacion;
pub mod profesionales;

use sqlx::SqlitePool;

/// Idempotent schema bootstrap, applied at startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS profesionales (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL UNIQUE,
        categoria TEXT NOT NULL DEFAULT 'ORL'
    )",
    "CREATE TABLE IF NOT EXISTS caja_diaria (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fecha TEXT NOT NULL,
        paciente TEXT NOT NULL DEFAULT '',
        dni TEXT NOT NULL DEFAULT '',
        obra_social TEXT,
        prof_1_id INTEGER REFERENCES profesionales(id),
        prof_2_id INTEGER REFERENCES profesionales(id),
        anestesista_id INTEGER REFERENCES profesionales(id),
        monto_pesos REAL NOT NULL DEFAULT 0,
        monto_dolares REAL NOT NULL DEFAULT 0,
        liq_prof_1 REAL NOT NULL DEFAULT 0,
        liq_prof_1_currency TEXT NOT NULL DEFAULT 'ARS',
        liq_prof_2 REAL NOT NULL DEFAULT 0,
        liq_prof_2_currency TEXT NOT NULL DEFAULT 'ARS',
        liq_anestesista REAL NOT NULL DEFAULT 0,
        liq_anestesista_currency TEXT NOT NULL DEFAULT 'ARS',
        coat_pesos REAL NOT NULL DEFAULT 0,
        coat_dolares REAL NOT NULL DEFAULT 0,
        comentario TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_caja_diaria_fecha ON caja_diaria (fecha)",
    // Single configuration row with named fields (id is pinned to 1).
    "CREATE TABLE IF NOT EXISTS app_config (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        admin_pin TEXT NOT NULL DEFAULT '1234'
    )",
    "CREATE TABLE IF NOT EXISTS daily_comments (
        fecha TEXT PRIMARY KEY,
        comentario TEXT NOT NULL DEFAULT ''
    )",
    "INSERT OR IGNORE INTO app_config (id, admin_pin) VALUES (1, '1234')",
];

/// Create tables and seed the config row. Safe to run on every startup.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
