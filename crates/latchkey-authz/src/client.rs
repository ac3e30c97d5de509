//! HTTP client for the access-check exchange.
//!
//! # Outcome Mapping
//!
//! | Exchange result                         | Outcome       |
//! |-----------------------------------------|---------------|
//! | 200 + body with `"granted": true`       | `Granted`     |
//! | 200 + body with `"granted": false`      | `Denied`      |
//! | connect/transport error                 | `Unreachable` |
//! | deadline elapsed                        | `TimedOut`    |
//! | non-200 status, or unparseable body     | `Malformed`   |
//!
//! The caller treats everything except `Granted` identically (deny), so a
//! mapping choice here only ever changes what the logs say.
//!
//! # Cancellation
//!
//! [`AuthzClient::authorize`] races the exchange against the deadline with
//! [`tokio::time::timeout`]. On expiry the exchange future is dropped,
//! which aborts the underlying request; a grant that arrives after the
//! deadline has no path back to the caller.

use crate::wire::{AccessCheckRequest, AccessCheckResponse};
use latchkey_core::{
    AuthorizationOutcome, Error, Result,
    constants::{ACCESS_CHECK_PATH, HTTP_TIMEOUT_MS, MAX_ACCEPTABLE_LATENCY_MS},
};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the authorization client.
///
/// # Example
///
/// ```
/// use latchkey_authz::AuthzClientConfig;
/// use std::time::Duration;
///
/// let config = AuthzClientConfig {
///     base_url: "http://192.168.0.100:8000".to_string(),
///     deadline: Duration::from_millis(1000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AuthzClientConfig {
    /// Base URL of the authorization server, scheme and authority only
    /// (e.g. `http://127.0.0.1:8000`). The access-check path is appended.
    pub base_url: String,

    /// Hard deadline for one authorize call.
    pub deadline: Duration,
}

impl Default for AuthzClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            deadline: Duration::from_millis(MAX_ACCEPTABLE_LATENCY_MS),
        }
    }
}

/// One-shot HTTP client for access-check decisions.
///
/// Wraps a pooled `reqwest::Client`; each [`authorize`](Self::authorize)
/// call performs exactly one request-response exchange and never retries.
///
/// # Example
///
/// ```no_run
/// use latchkey_authz::{AccessCheckRequest, AuthzClient, AuthzClientConfig};
/// use latchkey_core::{CardUid, DeviceId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AuthzClient::new(AuthzClientConfig::default())?;
///
/// let request = AccessCheckRequest::new(
///     &DeviceId::new("door-control-01")?,
///     &CardUid::parse("AA:BB:CC:01")?,
///     chrono::Utc::now(),
/// );
///
/// let outcome = client.authorize(&request).await;
/// if outcome.is_granted() {
///     println!("open the door");
/// }
/// # Ok(())
/// # }
/// ```
pub struct AuthzClient {
    http: reqwest::Client,
    endpoint: String,
    deadline: Duration,
}

impl AuthzClient {
    /// Create a client from configuration.
    ///
    /// The underlying HTTP client carries a coarse request timeout as a
    /// backstop; the per-call deadline is enforced separately and is the
    /// one that matters for decisions.
    ///
    /// # Errors
    /// Returns `Error::Config` if the HTTP client cannot be constructed.
    pub fn new(config: AuthzClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(HTTP_TIMEOUT_MS))
            .http1_only()
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;

        let endpoint = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            ACCESS_CHECK_PATH
        );

        Ok(Self {
            http,
            endpoint,
            deadline: config.deadline,
        })
    }

    /// Full URL of the access-check endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one decision exchange under the configured deadline.
    pub async fn authorize(&self, request: &AccessCheckRequest) -> AuthorizationOutcome {
        self.authorize_within(request, self.deadline).await
    }

    /// Perform one decision exchange under an explicit deadline.
    ///
    /// Suspends the caller until a decision is available or the deadline
    /// elapses, whichever comes first. Never returns an error: every
    /// failure mode is absorbed into a non-grant outcome (fail-secure).
    pub async fn authorize_within(
        &self,
        request: &AccessCheckRequest,
        deadline: Duration,
    ) -> AuthorizationOutcome {
        debug!(
            card = %request.card_uid,
            endpoint = %self.endpoint,
            deadline_ms = deadline.as_millis() as u64,
            "access check"
        );

        match tokio::time::timeout(deadline, self.exchange(request)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                // The exchange future is dropped here; the request is gone.
                warn!(
                    card = %request.card_uid,
                    deadline_ms = deadline.as_millis() as u64,
                    "authorization deadline elapsed"
                );
                AuthorizationOutcome::TimedOut
            }
        }
    }

    async fn exchange(&self, request: &AccessCheckRequest) -> AuthorizationOutcome {
        let response = match self.http.post(&self.endpoint).json(request).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(card = %request.card_uid, error = %e, "authorization request timed out");
                return AuthorizationOutcome::TimedOut;
            }
            Err(e) => {
                warn!(card = %request.card_uid, error = %e, "authorization server unreachable");
                return AuthorizationOutcome::Unreachable;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                card = %request.card_uid,
                status = status.as_u16(),
                "unexpected authorization status"
            );
            return AuthorizationOutcome::Malformed;
        }

        match response.json::<AccessCheckResponse>().await {
            Ok(body) if body.granted => AuthorizationOutcome::Granted,
            Ok(_) => AuthorizationOutcome::Denied,
            Err(e) => {
                warn!(card = %request.card_uid, error = %e, "unparseable authorization response");
                AuthorizationOutcome::Malformed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url_and_path() {
        let client = AuthzClient::new(AuthzClientConfig {
            base_url: "http://10.0.0.5:8000".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://10.0.0.5:8000/api/access/check");
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = AuthzClient::new(AuthzClientConfig {
            base_url: "http://10.0.0.5:8000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://10.0.0.5:8000/api/access/check");
    }

    #[test]
    fn test_default_deadline_matches_latency_budget() {
        let config = AuthzClientConfig::default();
        assert_eq!(
            config.deadline,
            Duration::from_millis(MAX_ACCEPTABLE_LATENCY_MS)
        );
    }
}
