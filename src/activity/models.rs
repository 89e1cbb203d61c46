//! Data models for per-deck activity files
//!
//! Scheduler-owned fields are carried as an opaque JSON payload. Only the
//! timestamp fields are interpreted, and only when they hold RFC 3339 text;
//! anything else is kept in the payload untouched so it round-trips.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Scheduling snapshot for one card
///
/// A typed timestamp that is set takes precedence over a payload entry with
/// the same key when serialized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct CardState {
    pub due: Option<DateTime<Utc>>,
    pub last_review: Option<DateTime<Utc>>,
    /// Scheduler payload, passed through as-is
    pub fields: Map<String, Value>,
}

impl CardState {
    pub fn new(due: DateTime<Utc>, last_review: Option<DateTime<Utc>>) -> Self {
        Self {
            due: Some(due),
            last_review,
            fields: Map::new(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a payload entry. Setting `due` or `last_review` here clears the
    /// typed timestamp of the same name.
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        match key {
            "due" => self.due = None,
            "last_review" => self.last_review = None,
            _ => {}
        }
        self.fields.insert(key.to_string(), value.into());
    }

    /// A card without a readable due date is treated as due
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due.map_or(true, |due| due <= now)
    }
}

impl Serialize for CardState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_record(
            serializer,
            &[("due", self.due), ("last_review", self.last_review)],
            &self.fields,
        )
    }
}

impl From<Map<String, Value>> for CardState {
    fn from(mut fields: Map<String, Value>) -> Self {
        let due = take_timestamp(&mut fields, "due");
        let last_review = take_timestamp(&mut fields, "last_review");
        Self {
            due,
            last_review,
            fields,
        }
    }
}

/// Immutable record of one grading event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ReviewLog {
    pub review: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
    /// Scheduler outcome payload, passed through as-is
    pub fields: Map<String, Value>,
}

impl ReviewLog {
    pub fn new(review: DateTime<Utc>, due: DateTime<Utc>) -> Self {
        Self {
            review: Some(review),
            due: Some(due),
            fields: Map::new(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a payload entry; `review` and `due` clear the typed timestamp
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        match key {
            "review" => self.review = None,
            "due" => self.due = None,
            _ => {}
        }
        self.fields.insert(key.to_string(), value.into());
    }
}

impl Serialize for ReviewLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_record(
            serializer,
            &[("review", self.review), ("due", self.due)],
            &self.fields,
        )
    }
}

impl From<Map<String, Value>> for ReviewLog {
    fn from(mut fields: Map<String, Value>) -> Self {
        let review = take_timestamp(&mut fields, "review");
        let due = take_timestamp(&mut fields, "due");
        Self {
            review,
            due,
            fields,
        }
    }
}

/// Everything stored for one deck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub states: BTreeMap<String, CardState>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: BTreeMap<String, Vec<ReviewLog>>,
}

impl ActivitySnapshot {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.logs.is_empty()
    }

    /// Serialized file contents
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Remove `key` from `fields` if it holds a parseable timestamp string
fn take_timestamp(fields: &mut Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let parsed = match fields.get(key) {
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(text)
            .ok()?
            .with_timezone(&Utc),
        _ => return None,
    };
    fields.remove(key);
    Some(parsed)
}

/// Write set timestamps first, then every payload entry they do not shadow
fn serialize_record<S: Serializer>(
    serializer: S,
    timestamps: &[(&str, Option<DateTime<Utc>>)],
    fields: &Map<String, Value>,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    for (key, value) in timestamps {
        if let Some(ts) = value {
            map.serialize_entry(key, &ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
        }
    }
    for (key, value) in fields {
        let shadowed = timestamps
            .iter()
            .any(|(name, ts)| ts.is_some() && *name == key.as_str());
        if !shadowed {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_card_state_hydrates_timestamps() {
        let state: CardState = serde_json::from_str(
            r#"{ "due": "2026-03-01T10:00:00.000Z", "last_review": "2026-02-28T09:30:00Z",
                 "stability": 4.2, "reps": 3 }"#,
        )
        .unwrap();

        assert_eq!(state.due, Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()));
        assert_eq!(
            state.last_review,
            Some(Utc.with_ymd_and_hms(2026, 2, 28, 9, 30, 0).unwrap())
        );
        assert_eq!(state.field("reps"), Some(&Value::from(3)));
        assert!(state.field("due").is_none());
    }

    #[test]
    fn test_non_string_timestamps_are_untouched() {
        let text = r#"{"due":1767225600000,"last_review":"not a date","reps":1}"#;
        let state: CardState = serde_json::from_str(text).unwrap();

        assert!(state.due.is_none());
        assert!(state.last_review.is_none());
        assert_eq!(state.field("due"), Some(&Value::from(1767225600000u64)));

        let back: Value = serde_json::to_value(&state).unwrap();
        let original: Value = serde_json::from_str(text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_typed_timestamp_replaces_stale_payload_entry() {
        let mut state: CardState =
            serde_json::from_str(r#"{"due":1767225600000,"reps":2}"#).unwrap();
        let due = Utc.with_ymd_and_hms(2026, 6, 2, 12, 0, 0).unwrap();
        state.due = Some(due);

        let text = serde_json::to_string(&state).unwrap();
        assert_eq!(text.matches("\"due\"").count(), 1);

        let back: CardState = serde_json::from_str(&text).unwrap();
        assert_eq!(back.due, Some(due));
        assert_eq!(back.field("reps"), Some(&Value::from(2)));

        let mut log = ReviewLog::new(due, due);
        log.fields.insert("review".to_string(), Value::from(0));
        let back: ReviewLog = serde_json::from_str(&serde_json::to_string(&log).unwrap()).unwrap();
        assert_eq!(back.review, Some(due));
    }

    #[test]
    fn test_set_field_clears_typed_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut state = CardState::new(t0, Some(t0));
        state.set_field("due", 42);

        assert!(state.due.is_none());
        let back: Value = serde_json::to_value(&state).unwrap();
        assert_eq!(back["due"], Value::from(42));
        assert!(back["last_review"].is_string());
    }

    #[test]
    fn test_timestamp_precision_survives() {
        let due = Utc.timestamp_nanos(1_767_225_600_123_456_789);
        let state = CardState::new(due, None);

        let text = serde_json::to_string(&state).unwrap();
        let back: CardState = serde_json::from_str(&text).unwrap();
        assert_eq!(back.due, Some(due));
        assert!(!text.contains("last_review"));
    }

    #[test]
    fn test_review_log_hydration() {
        let log: ReviewLog = serde_json::from_str(
            r#"{ "review": "2026-01-01T00:00:00Z", "due": "2026-01-02T00:00:00Z", "rating": 3 }"#,
        )
        .unwrap();
        assert!(log.review.unwrap() < log.due.unwrap());
        assert_eq!(log.field("rating"), Some(&Value::from(3)));
    }

    #[test]
    fn test_snapshot_tolerates_missing_and_null_mappings() {
        let empty = ActivitySnapshot::from_slice(b"{}").unwrap();
        assert!(empty.is_empty());

        let nulls = ActivitySnapshot::from_slice(br#"{ "states": null, "logs": null }"#).unwrap();
        assert!(nulls.is_empty());
    }

    #[test]
    fn test_snapshot_serialization_is_stable() {
        let mut snapshot = ActivitySnapshot::default();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        snapshot.states.insert("b".to_string(), CardState::new(t0, Some(t0)));
        snapshot.states.insert("a".to_string(), CardState::new(t0, None));

        let first = snapshot.to_bytes().unwrap();
        let second = snapshot.clone().to_bytes().unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
    }
}
