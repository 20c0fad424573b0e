//! Error types for hardware operations.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Card reading error.
    #[error("Card read error: {message}")]
    CardReadError { message: String },

    /// Reader bring-up failed after exhausting the retry budget.
    #[error("Initialization failed after {attempts} attempts: {message}")]
    InitializationFailed { attempts: u32, message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new card read error.
    pub fn card_read(message: impl Into<String>) -> Self {
        Self::CardReadError {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(attempts: u32, message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            attempts,
            message: message.into(),
        }
    }
}

impl From<HardwareError> for doorkeep_core::Error {
    fn from(err: HardwareError) -> Self {
        match err {
            HardwareError::InitializationFailed { attempts, .. } => {
                doorkeep_core::Error::ReaderInit { attempts }
            }
            other => doorkeep_core::Error::Hardware(other.to_string()),
        }
    }
}
