use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid card UID: {0}")]
    InvalidCardUid(String),

    #[error("Invalid device ID: {0}")]
    InvalidDeviceId(String),

    // Lock actuator errors
    #[error("Lock task stopped")]
    LockTaskStopped,

    // Hardware errors surfaced into the control loop
    #[error("Hardware error: {0}")]
    Hardware(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
