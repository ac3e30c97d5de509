//! Hardware device trait definitions.
//!
//! These traits establish the contract between the access-decision pipeline
//! and the peripheral devices it touches, enabling substitution between mock
//! and real hardware implementations.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use latchkey_core::CardUid;
use std::future::Future;
use std::time::Instant;

/// One card presentation observed by the reader.
///
/// Produced by [`CredentialReader::poll_card`] and consumed exactly once by
/// the debounce filter. `detected_at` is monotonic time, suitable for
/// cooldown arithmetic and latency measurement; wall-clock time for the
/// authorization request is taken separately by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRead {
    /// Card unique identifier.
    pub uid: CardUid,

    /// Monotonic instant at which the card was detected.
    pub detected_at: Instant,
}

impl CardRead {
    /// Create a card read stamped with the current instant.
    #[must_use]
    pub fn new(uid: CardUid) -> Self {
        Self {
            uid,
            detected_at: Instant::now(),
        }
    }

    /// Create a card read with an explicit detection instant.
    ///
    /// Useful in tests that replay presentations at controlled times.
    #[must_use]
    pub fn at(uid: CardUid, detected_at: Instant) -> Self {
        Self { uid, detected_at }
    }
}

/// RFID credential reader abstraction.
///
/// Represents a reader such as an RC522 module. Polling is non-blocking:
/// a call returns immediately with `Ok(None)` when no new card is present.
/// Reading a card also acknowledges the hardware's "new tag present" latch,
/// so a card held against the reader is not re-emitted on every poll; when
/// the hardware re-presents it, the debounce filter upstream decides whether
/// it is processed again.
pub trait CredentialReader: Send {
    /// Poll for a newly presented card.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs. "No card present" is `Ok(None)`, not an error.
    async fn poll_card(&mut self) -> Result<Option<CardRead>>;
}

/// Relay driving the electromagnetic lock solenoid.
///
/// Deliberately dumb: energize and release, nothing else. The timed
/// unlock-then-relock cycle is owned by the lock actuator in the firmware
/// crate, which is the only component allowed to command this relay.
pub trait RelayDrive: Send {
    /// Energize the solenoid (door unlocked).
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be driven.
    fn energize(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// De-energize the solenoid (door locked). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be driven.
    fn release(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Status lamp for operator feedback.
///
/// A single LED is enough for the door controller's three patterns; the
/// indicator controller composes pulses out of raw on/off sets.
pub trait IndicatorLamp: Send {
    /// Switch the lamp on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the lamp cannot be driven.
    async fn set(&mut self, on: bool) -> Result<()>;
}

/// Network link state monitor.
///
/// A pure snapshot read of externally managed link state (association,
/// reconnect backoff and the rest belong to the platform's network stack,
/// not to this crate). Must never block.
pub trait LinkMonitor: Send + Sync {
    /// Whether the device's network attachment is currently up.
    fn is_up(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_read_stamps_now() {
        let before = Instant::now();
        let read = CardRead::new(CardUid::new(vec![0xAA, 0xBB, 0xCC, 0x01]).unwrap());
        assert!(read.detected_at >= before);
        assert_eq!(read.uid.to_hex(), "AA:BB:CC:01");
    }

    #[test]
    fn test_card_read_at_explicit_instant() {
        let instant = Instant::now();
        let uid = CardUid::new(vec![1, 2, 3, 4]).unwrap();
        let read = CardRead::at(uid.clone(), instant);
        assert_eq!(read.detected_at, instant);
        assert_eq!(read.uid, uid);
    }
}
