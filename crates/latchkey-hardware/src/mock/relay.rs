//! Mock lock relay recording its drive history.

use crate::{Result, traits::RelayDrive};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct RelayState {
    energized: bool,
    /// State changes in order: `true` = energized, `false` = released.
    transitions: Vec<bool>,
}

/// Mock solenoid relay for testing the lock actuator.
///
/// Starts de-energized (door locked). The paired [`MockRelayHandle`] can
/// observe the current state and the full transition history, so tests can
/// assert both "the door is locked now" and "the door was never energized".
#[derive(Debug)]
pub struct MockRelay {
    state: Arc<Mutex<RelayState>>,
}

impl MockRelay {
    /// Create a new mock relay and its inspection handle.
    pub fn new() -> (Self, MockRelayHandle) {
        let state = Arc::new(Mutex::new(RelayState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockRelayHandle { state },
        )
    }
}

impl RelayDrive for MockRelay {
    async fn energize(&mut self) -> Result<()> {
        let mut state = self.state.lock().expect("relay state poisoned");
        if !state.energized {
            state.energized = true;
            state.transitions.push(true);
        }
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        let mut state = self.state.lock().expect("relay state poisoned");
        if state.energized {
            state.energized = false;
            state.transitions.push(false);
        }
        Ok(())
    }
}

/// Inspection handle for a [`MockRelay`].
#[derive(Debug, Clone)]
pub struct MockRelayHandle {
    state: Arc<Mutex<RelayState>>,
}

impl MockRelayHandle {
    /// Whether the solenoid is currently energized.
    pub fn is_energized(&self) -> bool {
        self.state.lock().expect("relay state poisoned").energized
    }

    /// State changes in order (`true` = energized, `false` = released).
    pub fn transitions(&self) -> Vec<bool> {
        self.state
            .lock()
            .expect("relay state poisoned")
            .transitions
            .clone()
    }
}
