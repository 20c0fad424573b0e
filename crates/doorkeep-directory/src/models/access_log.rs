use serde::{Deserialize, Serialize};

/// One access-log entry posted to `POST /access/log`.
///
/// Sent after every decision regardless of outcome, best-effort: a failed
/// post is logged and forgotten, never blocking the decision path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    /// Credential method; this device only reads proximity cards.
    pub method: String,

    /// Matched user id; absent when the card was not recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Whether access was granted.
    pub result: bool,
}

impl AccessLogEntry {
    /// Entry for a granted decision.
    #[must_use]
    pub fn granted(user_id: i64) -> Self {
        AccessLogEntry {
            method: "rfid".to_string(),
            user_id: Some(user_id),
            result: true,
        }
    }

    /// Entry for a denied decision.
    #[must_use]
    pub fn denied() -> Self {
        AccessLogEntry {
            method: "rfid".to_string(),
            user_id: None,
            result: false,
        }
    }
}
