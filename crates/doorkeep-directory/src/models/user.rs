use super::timestamp;
use chrono::{DateTime, Utc};
use doorkeep_core::CardId;
use serde::{Deserialize, Serialize};

/// One authorized user as served by `GET /users`.
///
/// The record is owned entirely by the remote directory; the device reads it
/// transiently per decision and never caches it (freshness over latency).
///
/// # Wire format
///
/// ```json
/// {"id": 1, "rfid": "04aa", "accessStart": "2025-05-10T08:00:00Z", "accessEnd": "2025-05-10T18:00:00Z"}
/// ```
///
/// `accessStart`/`accessEnd` delimit the user's access window, inclusive at
/// both ends. Offset-less timestamps are read as UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Directory-assigned user id.
    pub id: i64,

    /// The card enrolled for this user.
    pub rfid: CardId,

    /// Start of the access window (inclusive).
    #[serde(with = "timestamp")]
    pub access_start: DateTime<Utc>,

    /// End of the access window (inclusive).
    #[serde(with = "timestamp")]
    pub access_end: DateTime<Utc>,
}

impl UserRecord {
    /// Whether `now` falls inside this user's access window, inclusive both
    /// ends.
    #[must_use]
    pub fn window_contains(&self, now: DateTime<Utc>) -> bool {
        self.access_start <= now && now <= self.access_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(start: DateTime<Utc>, end: DateTime<Utc>) -> UserRecord {
        UserRecord {
            id: 1,
            rfid: "04aa".parse().unwrap(),
            access_start: start,
            access_end: end,
        }
    }

    #[test]
    fn test_window_inclusive_bounds() {
        let start = Utc.with_ymd_and_hms(2025, 5, 10, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 5, 10, 18, 0, 0).unwrap();
        let user = record(start, end);

        assert!(user.window_contains(start));
        assert!(user.window_contains(end));
        assert!(user.window_contains(start + chrono::Duration::hours(1)));
        assert!(!user.window_contains(start - chrono::Duration::seconds(1)));
        assert!(!user.window_contains(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{
            "id": 7,
            "rfid": "04abcdef",
            "accessStart": "2025-05-10T08:00:00Z",
            "accessEnd": "2025-05-10T18:00:00"
        }"#;

        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.rfid.to_hex(), "04abcdef");
        assert_eq!(
            user.access_end,
            Utc.with_ymd_and_hms(2025, 5, 10, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_serialize_uses_camel_case_keys() {
        let start = Utc.with_ymd_and_hms(2025, 5, 10, 8, 0, 0).unwrap();
        let user = record(start, start + chrono::Duration::hours(10));

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("accessStart").is_some());
        assert!(value.get("accessEnd").is_some());
        assert_eq!(value["rfid"], "04aa");
    }
}
