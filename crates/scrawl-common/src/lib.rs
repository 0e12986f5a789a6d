//! # Scrawl Common
//!
//! Shared types, errors, and constants used across Scrawl components.
//!
//! ## Modules
//! - `types` - Core data structures (Color, Stage, strategy kinds)
//! - `error` - The pipeline error taxonomy
//! - `constants` - Recognized config keys and their defaults

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Result, ScrawlError};
pub use types::*;
