//! Duplicate-read suppression for the credential reader.

use latchkey_core::CardUid;
use std::time::{Duration, Instant};
use tracing::debug;

/// Suppresses repeated processing of the same card within a cooldown
/// window.
///
/// A card held against the reader re-presents on every hardware latch
/// cycle; only the first read inside the window produces a decision
/// attempt. A different card is accepted immediately, and the same card is
/// accepted again once the window has elapsed. Rejected reads have no side
/// effects beyond a debug log.
#[derive(Debug)]
pub struct DebounceFilter {
    cooldown: Duration,
    last_uid: Option<CardUid>,
    last_seen_at: Option<Instant>,
}

impl DebounceFilter {
    /// Create a filter with the given cooldown window.
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_uid: None,
            last_seen_at: None,
        }
    }

    /// Decide whether a read should be processed.
    ///
    /// Returns `true` if `uid` differs from the last accepted card or the
    /// cooldown has elapsed since it was last seen. On acceptance the
    /// filter state is updated before returning, so back-to-back reads of
    /// the same card collapse to one. The very first read is always
    /// accepted.
    pub fn accept(&mut self, uid: &CardUid, now: Instant) -> bool {
        let same_card = self.last_uid.as_ref() == Some(uid);
        let within_cooldown = self
            .last_seen_at
            .is_some_and(|seen| now.saturating_duration_since(seen) < self.cooldown);

        if same_card && within_cooldown {
            debug!(card = %uid, "debounced repeat read");
            return false;
        }

        self.last_uid = Some(uid.clone());
        self.last_seen_at = Some(now);
        true
    }
}
