//! Authorization client for the Latchkey door controller.
//!
//! This crate owns the single remote exchange in the system: one HTTP POST
//! of an [`AccessCheckRequest`] to the authorization server, one
//! [`AccessCheckResponse`] back, mapped onto the fail-secure
//! [`AuthorizationOutcome`](latchkey_core::AuthorizationOutcome) taxonomy.
//!
//! # Design Principles
//!
//! The client is a deliberately thin transport layer:
//! - **No automatic retry**: a non-grant outcome is terminal for that
//!   credential event; retry policy, if ever added, belongs to the caller.
//! - **No differentiated failure handling**: every failure mode maps to an
//!   outcome variant, and every variant except `Granted` denies access.
//!   The taxonomy exists for the logs, not for behavior.
//! - **Hard deadline**: the exchange is raced against a deadline; on expiry
//!   the request future is dropped, so a late grant can never be applied.

pub mod client;
pub mod wire;

pub use client::{AuthzClient, AuthzClientConfig};
pub use wire::{AccessCheckRequest, AccessCheckResponse};
