//! Shared types, models and the forecast scoring engine for Paragliding Alerts
//!
//! This crate contains everything shared between the backend, the browser
//! (via WASM), and other components of the system. Nothing in it performs I/O.

pub mod models;
pub mod scoring;
pub mod types;
pub mod validation;

pub use models::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
