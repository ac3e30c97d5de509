//! Door controller configuration.

use latchkey_authz::AuthzClientConfig;
use latchkey_core::{
    DeviceId,
    constants::{
        CARD_DEBOUNCE_COOLDOWN_MS, DEFAULT_DEVICE_ID, LOCK_OPEN_DURATION_MS,
        MAX_ACCEPTABLE_LATENCY_MS, READER_POLL_INTERVAL_MS,
    },
};
use serde::Deserialize;
use std::time::Duration;

/// Configuration for one door controller.
///
/// Defaults mirror the deployed firmware constants; any subset of fields
/// can be overridden from a config file.
///
/// # Example
///
/// ```
/// use latchkey_firmware::DoorConfig;
///
/// let config: DoorConfig =
///     serde_json::from_str(r#"{ "server_url": "http://10.0.0.5:8000" }"#).unwrap();
/// assert_eq!(config.device_id.as_str(), "door-control-01");
/// assert_eq!(config.dwell().as_millis(), 3000);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Identity reported in authorization requests.
    pub device_id: DeviceId,

    /// Base URL of the authorization server.
    pub server_url: String,

    /// Hard deadline for one authorization exchange (milliseconds).
    pub deadline_ms: u64,

    /// How long the lock stays energized after a grant (milliseconds).
    pub dwell_ms: u64,

    /// Cooldown window for repeated reads of the same card (milliseconds).
    pub cooldown_ms: u64,

    /// Reader poll cadence (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            device_id: DeviceId::new(DEFAULT_DEVICE_ID).expect("default device id is valid"),
            server_url: "http://127.0.0.1:8000".to_string(),
            deadline_ms: MAX_ACCEPTABLE_LATENCY_MS,
            dwell_ms: LOCK_OPEN_DURATION_MS,
            cooldown_ms: CARD_DEBOUNCE_COOLDOWN_MS,
            poll_interval_ms: READER_POLL_INTERVAL_MS,
        }
    }
}

impl DoorConfig {
    /// Authorization exchange deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Lock dwell duration.
    #[must_use]
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Debounce cooldown window.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Reader poll cadence.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Derive the authorization client configuration.
    #[must_use]
    pub fn authz_config(&self) -> AuthzClientConfig {
        AuthzClientConfig {
            base_url: self.server_url.clone(),
            deadline: self.deadline(),
        }
    }
}
