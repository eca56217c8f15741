//! Domain models and request/response bodies

pub mod caja;
pub mod liquidacion;
pub mod profesional;
