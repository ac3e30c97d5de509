//! Bench harness for the door controller.
//!
//! Runs the full decision pipeline on mock peripherals against a real
//! authorization server: each line typed on stdin is parsed as a card UID
//! and presented to the mock reader, and the decision is visible in the
//! structured logs. Useful for exercising a server deployment without a
//! reader or relay on the desk.
//!
//! Environment:
//! - `LATCHKEY_CONFIG` — path to a JSON config file (all fields optional)
//! - `LATCHKEY_SERVER_URL` — authorization server base URL, overrides the
//!   config file (default `http://127.0.0.1:8000`)
//! - `RUST_LOG` — tracing filter (default `info`)

use anyhow::Context;
use latchkey_authz::AuthzClient;
use latchkey_core::CardUid;
use latchkey_firmware::{AccessController, DoorConfig, IndicatorController, spawn_lock};
use latchkey_hardware::mock::{MockLamp, MockLink, MockReader, MockRelay};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match std::env::var("LATCHKEY_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config file {path}"))?
        }
        Err(_) => DoorConfig::default(),
    };
    if let Ok(url) = std::env::var("LATCHKEY_SERVER_URL") {
        config.server_url = url;
    }

    let (reader, reader_handle) = MockReader::new();
    let (relay, _relay_handle) = MockRelay::new();
    let (lamp, _lamp_handle) = MockLamp::new();
    let (link, _link_handle) = MockLink::new(true);

    let authz = AuthzClient::new(config.authz_config()).context("building authorization client")?;
    let lock = spawn_lock(relay);
    let indicator = IndicatorController::new(lamp, config.dwell());
    let mut controller = AccessController::new(config, reader, link, authz, lock, indicator);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match CardUid::parse(line) {
                Ok(uid) => {
                    if reader_handle.present_card(uid).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "not a card UID"),
            }
        }
    });

    info!("present cards by typing UIDs (e.g. AA:BB:CC:01) on stdin");
    controller.run().await?;
    Ok(())
}
