use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Card errors
    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    // Hardware errors
    #[error("Reader initialization failed after {attempts} attempts")]
    ReaderInit { attempts: u32 },

    #[error("Hardware fault: {0}")]
    Hardware(String),

    // Directory errors
    #[error("Directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Enrollment rejected by directory: status {status}")]
    EnrollmentRejected { status: u16 },

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
