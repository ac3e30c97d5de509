//! Firmware constants for the door controller.
//!
//! Timing values come from the deployed door-control firmware configuration
//! and are shared by the debounce filter, the lock actuator, the indicator
//! patterns, and the authorization client. Durations are kept as plain
//! millisecond values here; call sites wrap them in [`std::time::Duration`].

// ============================================================================
// Device Identity
// ============================================================================

/// Default device identifier reported in authorization requests.
pub const DEFAULT_DEVICE_ID: &str = "door-control-01";

// ============================================================================
// Credential Reader
// ============================================================================

/// Interval between reader polls (milliseconds).
///
/// The control loop checks the reader for a newly presented card at this
/// cadence. 100ms keeps perceived responsiveness well under the overall
/// latency budget without busy-spinning the loop.
pub const READER_POLL_INTERVAL_MS: u64 = 100;

/// Minimum card UID length in bytes (per ISO 14443).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum card UID length in bytes (per ISO 14443).
pub const MAX_UID_LENGTH: usize = 10;

// ============================================================================
// Debounce
// ============================================================================

/// Cooldown window for repeated reads of the same card (milliseconds).
///
/// A card held against the reader re-presents every poll; within this window
/// only the first read produces a decision attempt. A different card is
/// accepted immediately regardless of the window.
pub const CARD_DEBOUNCE_COOLDOWN_MS: u64 = 3000;

// ============================================================================
// Lock Control
// ============================================================================

/// Dwell duration: how long the lock stays energized after a grant
/// (milliseconds). The relock timer is self-terminating and owned by the
/// lock actuator task.
pub const LOCK_OPEN_DURATION_MS: u64 = 3000;

// ============================================================================
// Authorization Latency Budget
// ============================================================================

/// Soft latency target for an authorization decision (milliseconds).
///
/// Used for observability only: decisions slower than this are logged at
/// warn level but are otherwise processed normally.
pub const TARGET_LATENCY_MS: u64 = 500;

/// Hard deadline for one authorization exchange (milliseconds).
///
/// An exchange that has not produced a decision by this deadline is
/// abandoned and treated as `TimedOut`, which denies access. This is the
/// upper bound on how long the control loop may suspend per credential.
pub const MAX_ACCEPTABLE_LATENCY_MS: u64 = 1000;

/// Client-level cap on any single HTTP request (milliseconds).
///
/// A backstop above [`MAX_ACCEPTABLE_LATENCY_MS`] so a misconfigured
/// per-call deadline can never leave a request hanging indefinitely.
pub const HTTP_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Authorization Endpoint
// ============================================================================

/// Path of the access-check endpoint on the authorization server.
pub const ACCESS_CHECK_PATH: &str = "/api/access/check";

// ============================================================================
// Indicator Patterns
// ============================================================================

/// Number of pulses in the access-denied pattern.
pub const DENIED_PULSE_COUNT: u32 = 3;

/// On/off phase duration of one denied pulse (milliseconds). Slow pulses.
pub const DENIED_PULSE_MS: u64 = 200;

/// Number of pulses in the error pattern (no connectivity, timeout,
/// malformed reply).
pub const ERROR_PULSE_COUNT: u32 = 5;

/// On/off phase duration of one error pulse (milliseconds). Fast pulses,
/// visually distinct from the denied pattern.
pub const ERROR_PULSE_MS: u64 = 100;
