//! Mock network-link monitor with externally controlled state.

use crate::traits::LinkMonitor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mock link monitor for testing connectivity gating.
///
/// The firmware side sees a [`LinkMonitor`] snapshot; the test side flips
/// the link through the paired [`MockLinkHandle`], modeling the platform
/// network stack going up and down underneath the controller.
#[derive(Debug)]
pub struct MockLink {
    up: Arc<AtomicBool>,
}

impl MockLink {
    /// Create a new mock link in the given initial state.
    pub fn new(initially_up: bool) -> (Self, MockLinkHandle) {
        let up = Arc::new(AtomicBool::new(initially_up));
        (
            Self {
                up: Arc::clone(&up),
            },
            MockLinkHandle { up },
        )
    }
}

impl LinkMonitor for MockLink {
    fn is_up(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }
}

/// Control handle for a [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    up: Arc<AtomicBool>,
}

impl MockLinkHandle {
    /// Set the link state.
    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }
}
