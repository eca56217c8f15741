//! Professional registry models

use serde::{Deserialize, Serialize};

/// A clinic professional. `categoria` is a free string; known values are
/// "ORL", "Anestesista" and "Estetica".
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profesional {
    pub id: i64,
    pub nombre: String,
    pub categoria: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfesionalCreate {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
}
