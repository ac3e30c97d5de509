//! Operator feedback patterns on the status lamp.

use latchkey_core::constants::{
    DENIED_PULSE_COUNT, DENIED_PULSE_MS, ERROR_PULSE_COUNT, ERROR_PULSE_MS,
};
use latchkey_hardware::{IndicatorLamp, Result};
use std::time::Duration;

/// Visual feedback patterns.
///
/// Denied and Error are deliberately the only distinction an unauthorized
/// presenter can observe; all non-grant outcomes of one kind look the
/// same, so the lamp leaks nothing about server versus network state
/// beyond "not granted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPattern {
    /// Steady lamp for the grant feedback window.
    Granted,

    /// 3 slow pulses: the authority said no.
    Denied,

    /// 5 fast pulses: no decision could be obtained.
    Error,
}

/// Drives one pattern at a time on the status lamp.
///
/// Patterns are played inline: `signal` suspends its caller for the
/// pattern duration, matching the intentionally blocking feedback of the
/// original panel. No state is retained between calls.
#[derive(Debug)]
pub struct IndicatorController<L: IndicatorLamp> {
    lamp: L,
    grant_hold: Duration,
}

impl<L: IndicatorLamp> IndicatorController<L> {
    /// Create a controller; `grant_hold` is how long the lamp stays lit
    /// after a grant (typically the lock dwell).
    pub fn new(lamp: L, grant_hold: Duration) -> Self {
        Self { lamp, grant_hold }
    }

    /// Play one feedback pattern to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the lamp cannot be driven.
    pub async fn signal(&mut self, pattern: IndicatorPattern) -> Result<()> {
        match pattern {
            IndicatorPattern::Granted => {
                self.lamp.set(true).await?;
                tokio::time::sleep(self.grant_hold).await;
                self.lamp.set(false).await
            }
            IndicatorPattern::Denied => {
                self.pulse(DENIED_PULSE_COUNT, Duration::from_millis(DENIED_PULSE_MS))
                    .await
            }
            IndicatorPattern::Error => {
                self.pulse(ERROR_PULSE_COUNT, Duration::from_millis(ERROR_PULSE_MS))
                    .await
            }
        }
    }

    async fn pulse(&mut self, count: u32, phase: Duration) -> Result<()> {
        for _ in 0..count {
            self.lamp.set(true).await?;
            tokio::time::sleep(phase).await;
            self.lamp.set(false).await?;
            tokio::time::sleep(phase).await;
        }
        Ok(())
    }
}
