//! Domain models for paragliding forecast scoring

mod alert_rule;
mod evaluation;
mod forecast;
mod site;
pub mod sky;

pub use alert_rule::*;
pub use evaluation::*;
pub use forecast::*;
pub use site::*;
