//! Hardware capability traits for the Latchkey door controller.
//!
//! This crate defines the seams between the access-decision pipeline and the
//! physical peripherals it drives: the RFID credential reader, the relay
//! energizing the solenoid lock, the status lamp, and the network-link
//! monitor. The traits use native `async fn` methods (Edition 2024 RPITIT),
//! so no `async_trait` macro is needed.
//!
//! Production drivers bind these traits to real hardware behind feature
//! flags; the [`mock`] module provides channel-driven fakes so the decision
//! pipeline can be exercised without a reader or a relay on the bench.
//!
//! # Design Philosophy
//!
//! - **Poll-based reader**: [`CredentialReader::poll_card`] returns
//!   immediately; the control loop owns the cadence.
//! - **Dumb relay**: [`RelayDrive`] only energizes and releases. The timed
//!   unlock state machine lives above the seam, in the firmware crate, so
//!   it can be tested against the mock.
//! - **Snapshot link state**: [`LinkMonitor::is_up`] never blocks and never
//!   initiates network activity; link management is someone else's job.

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{HardwareError, Result};
pub use traits::{CardRead, CredentialReader, IndicatorLamp, LinkMonitor, RelayDrive};
