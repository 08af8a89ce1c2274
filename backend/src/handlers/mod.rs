//! HTTP handlers for the evaluation API

pub mod evaluation;
pub mod health;
pub mod sites;

pub use evaluation::*;
pub use health::*;
pub use sites::*;
