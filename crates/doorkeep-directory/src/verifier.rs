//! Pure access decision over a fetched user list.
//!
//! Kept free of I/O and clocks: the caller supplies the user list and the
//! decision instant, so the whole authorize/deny rule is testable in
//! isolation.

use crate::models::UserRecord;
use chrono::{DateTime, Utc};
use doorkeep_core::CardId;

/// Outcome of one verification. Derived per decision, never stored.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    /// Whether the presented card is authorized right now.
    pub authorized: bool,

    /// The record that matched, when one did.
    pub matched_user: Option<UserRecord>,
}

impl AccessDecision {
    fn granted(user: UserRecord) -> Self {
        AccessDecision {
            authorized: true,
            matched_user: Some(user),
        }
    }

    fn denied() -> Self {
        AccessDecision {
            authorized: false,
            matched_user: None,
        }
    }

    /// Id of the matched user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.matched_user.as_ref().map(|user| user.id)
    }
}

/// Decide whether `card` is authorized at `now`.
///
/// Authorizes iff some record carries the same card and its access window
/// contains `now` (inclusive both ends). When several records match (the
/// directory is expected, not enforced, to keep one active window per card)
/// the first in fetched order wins.
#[must_use]
pub fn decide(card: &CardId, users: &[UserRecord], now: DateTime<Utc>) -> AccessDecision {
    users
        .iter()
        .find(|user| &user.rfid == card && user.window_contains(now))
        .map(|user| AccessDecision::granted(user.clone()))
        .unwrap_or_else(AccessDecision::denied)
}
