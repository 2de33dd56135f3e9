//! ArkStorm Common Utilities
//!
//! Shared infrastructure for all ArkStorm crates:
//! - Error taxonomy and result alias
//! - Tracing/logging initialization
//! - Default directories and logging settings

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
