//! JSON response bodies of the HTTP surface.

use serde::{Deserialize, Serialize};

/// Generic status/message body, used for both success and error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    /// A `success` body with the given message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        StatusResponse {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    /// An `error` body with the given message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        StatusResponse {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Body of a successful enrollment exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    /// Credential kind; always `rfid` on this device.
    #[serde(rename = "type")]
    pub kind: String,

    /// Hex identifier of the freshly enrolled card.
    pub card_id: String,

    pub status: String,
    pub message: String,
}

impl EnrollmentResponse {
    /// Success body for an enrolled card.
    #[must_use]
    pub fn enrolled(card_id: impl Into<String>) -> Self {
        EnrollmentResponse {
            kind: "rfid".to_string(),
            card_id: card_id.into(),
            status: "success".to_string(),
            message: "card enrolled".to_string(),
        }
    }
}
