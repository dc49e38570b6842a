//! Snapshot document types.

use crate::endpoint::HttpMethod;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// One endpoint's result inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub method: HttpMethod,
    pub payload: Value,
}

/// The result of one complete run.
///
/// Built only by the aggregator once every endpoint has been fetched, so
/// `entries` always holds exactly one entry per configured endpoint, in
/// fetch order. `data` is written in that same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(
        rename = "refreshed_utc",
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    captured_at: DateTime<Utc>,
    #[serde(rename = "base")]
    source_base: String,
    #[serde(
        rename = "data",
        serialize_with = "serialize_entries",
        deserialize_with = "deserialize_entries"
    )]
    entries: Vec<(String, SnapshotEntry)>,
}

impl Snapshot {
    pub(crate) fn new(
        captured_at: DateTime<Utc>,
        source_base: impl Into<String>,
        entries: Vec<(String, SnapshotEntry)>,
    ) -> Self {
        Self {
            // Second precision, as written on disk.
            captured_at: truncate_to_seconds(captured_at),
            source_base: source_base.into(),
            entries,
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn source_base(&self) -> &str {
        &self.source_base
    }

    /// Entries in fetch order.
    pub fn entries(&self) -> &[(String, SnapshotEntry)] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&SnapshotEntry> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, entry)| entry)
    }

    /// Endpoint names in fetch order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// RFC 3339 timestamp as written to `refreshed_utc`.
    pub fn refreshed_utc(&self) -> String {
        format_timestamp(&self.captured_at)
    }

    /// True when both snapshots carry the same data, ignoring `captured_at`.
    pub fn same_content(&self, other: &Snapshot) -> bool {
        self.source_base == other.source_base && self.entries == other.entries
    }

    /// Pretty-printed JSON document, UTF-8 text kept as-is.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.timestamp(), 0).unwrap_or(ts)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

fn serialize_entries<S: Serializer>(
    entries: &[(String, SnapshotEntry)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (name, entry) in entries {
        map.serialize_entry(name, entry)?;
    }
    map.end()
}

fn deserialize_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, SnapshotEntry)>, D::Error> {
    deserializer.deserialize_map(OrderedEntriesVisitor)
}

/// Reads `data` keeping document order and rejecting repeated names.
struct OrderedEntriesVisitor;

impl<'de> Visitor<'de> for OrderedEntriesVisitor {
    type Value = Vec<(String, SnapshotEntry)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of endpoint name to {method, payload}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, entry)) = access.next_entry::<String, SnapshotEntry>()? {
            if !seen.insert(name.clone()) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate endpoint '{}' in data",
                    name
                )));
            }
            entries.push((name, entry));
        }
        Ok(entries)
    }
}
