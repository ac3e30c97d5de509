//! Timed lock actuation.
//!
//! The lock runs as its own tokio task owning the relay, so the relock
//! timer is self-terminating: it fires on schedule even when the control
//! loop is suspended inside an authorization exchange for a later card,
//! and even if no further call ever arrives. All state mutations happen on
//! the lock task; the rest of the firmware observes through a watch
//! channel and commands through an mpsc channel.

use latchkey_core::{Error, Result};
use latchkey_hardware::RelayDrive;
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Observable lock phases.
///
/// The cycle is `Locked` → (grant) `Unlocking` → (dwell elapses) `Locked`.
/// `Locked` is the initial and fail-safe state: the task starts there and
/// returns there when shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Actuator de-energized, door secured.
    Locked,

    /// Actuator energized for the dwell window.
    Unlocking,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Locked => write!(f, "Locked"),
            LockState::Unlocking => write!(f, "Unlocking"),
        }
    }
}

#[derive(Debug)]
enum LockCommand {
    UnlockFor(Duration),
}

/// Handle to a running lock actuator task.
///
/// Cloneable; dropping the last handle shuts the task down, which releases
/// the relay first. Only the access controller should ever call
/// [`unlock_for`](Self::unlock_for), and only on a `Granted` outcome.
#[derive(Debug, Clone)]
pub struct LockHandle {
    cmd_tx: mpsc::Sender<LockCommand>,
    state_rx: watch::Receiver<LockState>,
}

impl LockHandle {
    /// Energize the lock now and auto-relock after `dwell`.
    ///
    /// If the lock is already unlocking, the dwell window restarts from
    /// zero; the actuator is never left energized indefinitely.
    ///
    /// # Errors
    /// Returns `Error::LockTaskStopped` if the actuator task is gone.
    pub async fn unlock_for(&self, dwell: Duration) -> Result<()> {
        self.cmd_tx
            .send(LockCommand::UnlockFor(dwell))
            .await
            .map_err(|_| Error::LockTaskStopped)
    }

    /// Current lock state snapshot.
    #[must_use]
    pub fn state(&self) -> LockState {
        *self.state_rx.borrow()
    }

    /// Wait until the lock reaches the given state.
    ///
    /// # Errors
    /// Returns `Error::LockTaskStopped` if the actuator task is gone.
    pub async fn wait_for(&mut self, state: LockState) -> Result<()> {
        self.state_rx
            .wait_for(|s| *s == state)
            .await
            .map(|_| ())
            .map_err(|_| Error::LockTaskStopped)
    }
}

/// Spawn the lock actuator task over a relay.
///
/// The lock starts `Locked` with the relay untouched; a cold start never
/// energizes anything.
pub fn spawn_lock<R>(relay: R) -> LockHandle
where
    R: RelayDrive + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (state_tx, state_rx) = watch::channel(LockState::Locked);

    tokio::spawn(run_lock_task(relay, cmd_rx, state_tx));

    LockHandle { cmd_tx, state_rx }
}

/// Placeholder deadline for a disabled relock timer branch.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 30)
}

async fn run_lock_task<R>(
    mut relay: R,
    mut cmd_rx: mpsc::Receiver<LockCommand>,
    state_tx: watch::Sender<LockState>,
) where
    R: RelayDrive,
{
    let mut relock_at: Option<Instant> = None;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(LockCommand::UnlockFor(dwell)) => {
                    if relock_at.is_none() {
                        match relay.energize().await {
                            Ok(()) => {
                                let _ = state_tx.send(LockState::Unlocking);
                                info!(dwell_ms = dwell.as_millis() as u64, "door unlocked");
                            }
                            Err(e) => {
                                // Relay refused: stay locked, no dwell window
                                error!(error = %e, "failed to energize lock relay");
                                continue;
                            }
                        }
                    } else {
                        debug!(dwell_ms = dwell.as_millis() as u64, "dwell window restarted");
                    }
                    relock_at = Some(Instant::now() + dwell);
                }
                None => {
                    // All handles dropped; secure the door and stop
                    if let Err(e) = relay.release().await {
                        error!(error = %e, "failed to release lock relay on shutdown");
                    }
                    let _ = state_tx.send(LockState::Locked);
                    break;
                }
            },
            _ = tokio::time::sleep_until(relock_at.unwrap_or_else(far_future)),
                if relock_at.is_some() =>
            {
                relock_at = None;
                if let Err(e) = relay.release().await {
                    error!(error = %e, "failed to release lock relay");
                }
                let _ = state_tx.send(LockState::Locked);
                info!("door relocked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hardware::mock::MockRelay;

    const DWELL: Duration = Duration::from_millis(3000);

    #[test]
    fn test_lock_state_display() {
        assert_eq!(LockState::Locked.to_string(), "Locked");
        assert_eq!(LockState::Unlocking.to_string(), "Unlocking");
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_locked_without_touching_relay() {
        let (relay, relay_handle) = MockRelay::new();
        let lock = spawn_lock(relay);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(lock.state(), LockState::Locked);
        assert!(relay_handle.transitions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_energizes_then_relocks_after_dwell() {
        let (relay, relay_handle) = MockRelay::new();
        let mut lock = spawn_lock(relay);

        lock.unlock_for(DWELL).await.unwrap();
        lock.wait_for(LockState::Unlocking).await.unwrap();
        assert!(relay_handle.is_energized());

        // Just before the dwell elapses the door is still open
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(lock.state(), LockState::Unlocking);
        assert!(relay_handle.is_energized());

        // The relock fires with no further external call
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(lock.state(), LockState::Locked);
        assert!(!relay_handle.is_energized());
        assert_eq!(relay_handle.transitions(), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_unlock_restarts_dwell_from_zero() {
        let (relay, relay_handle) = MockRelay::new();
        let mut lock = spawn_lock(relay);

        lock.unlock_for(DWELL).await.unwrap();
        lock.wait_for(LockState::Unlocking).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2000)).await;
        lock.unlock_for(DWELL).await.unwrap();

        // 2.9s after the restart (4.9s after the first grant): still open
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(lock.state(), LockState::Unlocking);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(lock.state(), LockState::Locked);

        // One energize/release cycle overall, never re-energized mid-window
        assert_eq!(relay_handle.transitions(), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_relocks_and_stops_task() {
        let (relay, relay_handle) = MockRelay::new();
        let lock = spawn_lock(relay);

        lock.unlock_for(DWELL).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(relay_handle.is_energized());

        drop(lock);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!relay_handle.is_energized());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_after_relock_runs_second_cycle() {
        let (relay, relay_handle) = MockRelay::new();
        let mut lock = spawn_lock(relay);

        lock.unlock_for(DWELL).await.unwrap();
        lock.wait_for(LockState::Unlocking).await.unwrap();
        lock.wait_for(LockState::Locked).await.unwrap();

        lock.unlock_for(DWELL).await.unwrap();
        lock.wait_for(LockState::Unlocking).await.unwrap();
        lock.wait_for(LockState::Locked).await.unwrap();

        assert_eq!(relay_handle.transitions(), vec![true, false, true, false]);
    }
}
