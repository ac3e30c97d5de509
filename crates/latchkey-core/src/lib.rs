//! Core domain types for the Latchkey door access controller.
//!
//! This crate defines the types shared by every other crate in the
//! workspace: the card identifier read from a presented credential, the
//! device identity, the outcome taxonomy of an authorization attempt, the
//! workspace error type, and the firmware timing constants.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
