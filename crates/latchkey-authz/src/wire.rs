//! Wire types for the access-check exchange.
//!
//! One JSON object per attempt in each direction:
//!
//! ```text
//! device -> authority: { "device_id": "...", "card_uid": "AA:BB:CC:01",
//!                        "timestamp": "2026-02-09T19:59:04.032Z" }
//! authority -> device: { "granted": true }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use latchkey_core::{CardUid, DeviceId};
use serde::{Deserialize, Serialize};

/// Decision request sent to the authorization server.
///
/// Constructed fresh per credential event; `card_uid` always matches the
/// triggering card read exactly.
#[derive(Debug, Clone, Serialize)]
pub struct AccessCheckRequest {
    /// Identity of the requesting door controller.
    pub device_id: String,

    /// Colon-separated uppercase hex card UID.
    pub card_uid: String,

    /// ISO-8601 UTC timestamp of the presentation.
    pub timestamp: String,
}

impl AccessCheckRequest {
    /// Build a request for one card presentation.
    #[must_use]
    pub fn new(device_id: &DeviceId, uid: &CardUid, issued_at: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.as_str().to_string(),
            card_uid: uid.to_hex(),
            timestamp: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Decision response from the authorization server.
///
/// Only the boolean `granted` field matters; extra fields are tolerated and
/// ignored. A body from which this shape cannot be deserialized is treated
/// as a malformed reply (deny).
#[derive(Debug, Clone, Deserialize)]
pub struct AccessCheckResponse {
    /// Whether access is granted.
    pub granted: bool,
}
