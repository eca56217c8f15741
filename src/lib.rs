//! caja-server — back-office cash ledger for a medical clinic
//!
//! Records daily billing entries ("caja") tying a patient visit to up to three
//! professionals (two treating professionals and an anesthetist), each with their
//! own settlement ("liquidación") amount and currency. Exposes an HTTP+JSON API
//! for professionals, ledger entries, per-professional settlement reports, an
//! admin PIN and per-day comments.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
