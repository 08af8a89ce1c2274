//! Business logic services for the Paragliding Alerts evaluation service

pub mod evaluation;
pub mod sites;

pub use evaluation::EvaluationService;
pub use sites::{Site, SiteRegistry};
