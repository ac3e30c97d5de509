//! End-to-end access decision orchestration.

use crate::{
    config::DoorConfig,
    debounce::DebounceFilter,
    indicator::{IndicatorController, IndicatorPattern},
    lock::LockHandle,
};
use chrono::Utc;
use latchkey_authz::{AccessCheckRequest, AuthzClient};
use latchkey_core::{AuthorizationOutcome, CardUid, Error, Result, constants::TARGET_LATENCY_MS};
use latchkey_hardware::{CardRead, CredentialReader, IndicatorLamp, LinkMonitor};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// One completed access decision, for observability only.
///
/// The outcome has already been acted on (lock, lamp) by the time a
/// `Decision` is returned; nothing downstream may re-interpret it.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Card the decision was made for.
    pub uid: CardUid,

    /// What the pipeline concluded.
    pub outcome: AuthorizationOutcome,

    /// Time from acceptance to decision (excludes feedback patterns).
    pub latency: Duration,
}

/// Orchestrates the decision pipeline for one door.
///
/// Owns every mutable piece of pipeline state (debounce window, reader,
/// indicator) on one task; the lock actuator is reached only through its
/// handle, so lock state mutations stay serialized on the lock task. At
/// most one authorization exchange is in flight at any time.
pub struct AccessController<R, M, L>
where
    R: CredentialReader,
    M: LinkMonitor,
    L: IndicatorLamp,
{
    config: DoorConfig,
    reader: R,
    link: M,
    authz: AuthzClient,
    debounce: DebounceFilter,
    lock: LockHandle,
    indicator: IndicatorController<L>,
}

impl<R, M, L> AccessController<R, M, L>
where
    R: CredentialReader,
    M: LinkMonitor,
    L: IndicatorLamp,
{
    /// Assemble the pipeline.
    pub fn new(
        config: DoorConfig,
        reader: R,
        link: M,
        authz: AuthzClient,
        lock: LockHandle,
        indicator: IndicatorController<L>,
    ) -> Self {
        let debounce = DebounceFilter::new(config.cooldown());
        Self {
            config,
            reader,
            link,
            authz,
            debounce,
            lock,
            indicator,
        }
    }

    /// Run the cooperative polling loop until the reader fails.
    ///
    /// # Errors
    /// Returns the hardware error that stopped the reader.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            device = %self.config.device_id,
            endpoint = %self.authz.endpoint(),
            "door controller started, lock is secured"
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval());
        loop {
            ticker.tick().await;
            self.poll_once().await?;
        }
    }

    /// One loop iteration: poll the reader and, if a fresh card was
    /// presented, run it through the decision pipeline.
    ///
    /// Returns `Ok(None)` when no card was present or the read was
    /// debounced.
    ///
    /// # Errors
    /// Returns an error only for reader hardware failures; decision
    /// failures are absorbed into non-grant outcomes.
    pub async fn poll_once(&mut self) -> Result<Option<Decision>> {
        let read = self
            .reader
            .poll_card()
            .await
            .map_err(|e| Error::Hardware(e.to_string()))?;

        let Some(read) = read else {
            return Ok(None);
        };

        if !self.debounce.accept(&read.uid, read.detected_at) {
            return Ok(None);
        }

        Ok(Some(self.decide(&read).await))
    }

    /// Run the decision pipeline for one accepted card read.
    async fn decide(&mut self, read: &CardRead) -> Decision {
        let started_at = Instant::now();

        let outcome = if self.link.is_up() {
            let request = AccessCheckRequest::new(&self.config.device_id, &read.uid, Utc::now());
            self.authz
                .authorize_within(&request, self.config.deadline())
                .await
        } else {
            // Fail-secure short circuit: no link, no network attempt
            info!(card = %read.uid, "link down, denying without network attempt");
            AuthorizationOutcome::Unreachable
        };

        let latency = started_at.elapsed();
        let decision = Decision {
            uid: read.uid.clone(),
            outcome,
            latency,
        };
        self.observe(&decision);

        if outcome.is_granted() {
            if let Err(e) = self.lock.unlock_for(self.config.dwell()).await {
                error!(card = %read.uid, error = %e, "grant could not reach the lock actuator");
            }
            if let Err(e) = self.indicator.signal(IndicatorPattern::Granted).await {
                warn!(error = %e, "indicator failure on grant");
            }
        } else {
            let pattern = match outcome {
                AuthorizationOutcome::Denied => IndicatorPattern::Denied,
                _ => IndicatorPattern::Error,
            };
            if let Err(e) = self.indicator.signal(pattern).await {
                warn!(error = %e, "indicator failure on deny");
            }
        }

        decision
    }

    /// Emit the observability record for a decision.
    fn observe(&self, decision: &Decision) {
        let latency_ms = decision.latency.as_millis() as u64;
        if latency_ms > TARGET_LATENCY_MS {
            warn!(
                card = %decision.uid,
                outcome = decision.outcome.label(),
                latency_ms,
                "access decision exceeded target latency"
            );
        } else {
            info!(
                card = %decision.uid,
                outcome = decision.outcome.label(),
                latency_ms,
                "access decision"
            );
        }
    }
}
