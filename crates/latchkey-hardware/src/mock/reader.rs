//! Mock credential reader driven over a channel.

use crate::{
    Result,
    traits::{CardRead, CredentialReader},
};
use latchkey_core::CardUid;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Mock RFID reader for testing and development.
///
/// Card presentations are injected through the paired [`MockReaderHandle`];
/// each injected read is delivered exactly once, which models the hardware
/// latch being acknowledged and cleared on read.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockReader;
/// use latchkey_hardware::traits::CredentialReader;
/// use latchkey_core::CardUid;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///
///     // Nothing presented yet
///     assert!(reader.poll_card().await?.is_none());
///
///     handle.present_card(CardUid::parse("AA:BB:CC:01").unwrap())?;
///     let read = reader.poll_card().await?.expect("card present");
///     assert_eq!(read.uid.to_hex(), "AA:BB:CC:01");
///
///     // Latch cleared; no re-emission
///     assert!(reader.poll_card().await?.is_none());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    event_rx: mpsc::Receiver<CardRead>,
}

impl MockReader {
    /// Create a new mock reader and its control handle.
    pub fn new() -> (Self, MockReaderHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        (Self { event_rx }, MockReaderHandle { event_tx })
    }
}

impl CredentialReader for MockReader {
    async fn poll_card(&mut self) -> Result<Option<CardRead>> {
        match self.event_rx.try_recv() {
            Ok(read) => Ok(Some(read)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(crate::HardwareError::disconnected("mock reader"))
            }
        }
    }
}

/// Control handle for simulating card presentations on a [`MockReader`].
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    event_tx: mpsc::Sender<CardRead>,
}

impl MockReaderHandle {
    /// Present a card to the reader, stamped with the current instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped or its event queue
    /// is full.
    pub fn present_card(&self, uid: CardUid) -> Result<()> {
        self.present_read(CardRead::new(uid))
    }

    /// Present a pre-built card read (custom detection instant).
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped or its event queue
    /// is full.
    pub fn present_read(&self, read: CardRead) -> Result<()> {
        self.event_tx.try_send(read).map_err(|e| match e {
            TrySendError::Closed(_) => crate::HardwareError::disconnected("mock reader"),
            TrySendError::Full(_) => crate::HardwareError::other("mock reader queue full"),
        })
    }
}
