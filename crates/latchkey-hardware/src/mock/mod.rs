//! Mock peripheral implementations for testing and development.
//!
//! Each mock comes as a `(device, handle)` pair: the device half implements
//! the corresponding hardware trait and is handed to the firmware, while the
//! handle stays with the test to simulate card presentations, flip link
//! state, or inspect what the firmware did to the relay and lamp.

mod lamp;
mod link;
mod reader;
mod relay;

pub use lamp::{MockLamp, MockLampHandle};
pub use link::{MockLink, MockLinkHandle};
pub use reader::{MockReader, MockReaderHandle};
pub use relay::{MockRelay, MockRelayHandle};
