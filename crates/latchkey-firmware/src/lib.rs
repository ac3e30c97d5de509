//! Latchkey door-control firmware: the access-decision pipeline.
//!
//! A presented card flows through this crate once per credential event:
//!
//! ```text
//! CredentialReader ─poll─> DebounceFilter ─accept─> AccessController
//!                                                        │
//!                        LinkMonitor up? ── no ──> Unreachable (deny)
//!                                │ yes
//!                        AuthzClient::authorize (hard deadline)
//!                                │
//!                  Granted ──> LockHandle::unlock_for + Granted lamp
//!               anything else ──> stay Locked + Denied/Error pattern
//! ```
//!
//! The lock actuator runs as its own task so the dwell timer relocks the
//! door on time even while the control loop is suspended inside an
//! authorization exchange for a later card. All `LockState` mutations
//! happen on that one task.
//!
//! Fail-secure throughout: the door is energized only as a direct,
//! synchronous consequence of a `Granted` outcome for the current card;
//! every ambiguity (no link, slow server, garbage reply) stays locked.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod indicator;
pub mod lock;

pub use config::DoorConfig;
pub use controller::{AccessController, Decision};
pub use debounce::DebounceFilter;
pub use indicator::{IndicatorController, IndicatorPattern};
pub use lock::{LockHandle, LockState, spawn_lock};
