//! Mock status lamp recording on/off sets.

use crate::{Result, traits::IndicatorLamp};
use std::sync::{Arc, Mutex};

/// Mock status LED for testing indicator patterns.
///
/// Every `set` call is recorded in order, so a test can count pulses:
/// one pulse is one `true` followed by one `false`.
#[derive(Debug)]
pub struct MockLamp {
    sets: Arc<Mutex<Vec<bool>>>,
}

impl MockLamp {
    /// Create a new mock lamp and its inspection handle.
    pub fn new() -> (Self, MockLampHandle) {
        let sets = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sets: Arc::clone(&sets),
            },
            MockLampHandle { sets },
        )
    }
}

impl IndicatorLamp for MockLamp {
    async fn set(&mut self, on: bool) -> Result<()> {
        self.sets.lock().expect("lamp state poisoned").push(on);
        Ok(())
    }
}

/// Inspection handle for a [`MockLamp`].
#[derive(Debug, Clone)]
pub struct MockLampHandle {
    sets: Arc<Mutex<Vec<bool>>>,
}

impl MockLampHandle {
    /// All `set` calls in order.
    pub fn sets(&self) -> Vec<bool> {
        self.sets.lock().expect("lamp state poisoned").clone()
    }

    /// Number of completed pulses (on followed by off).
    pub fn pulse_count(&self) -> usize {
        self.sets().iter().filter(|on| **on).count()
    }

    /// Whether the lamp is currently on (last recorded set).
    pub fn is_on(&self) -> bool {
        self.sets().last().copied().unwrap_or(false)
    }
}
