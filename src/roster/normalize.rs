use serde_json::Value;
use tracing::{debug, warn};

use crate::model::employee::EmployeeRecord;

/// The outer shapes the roster source has been seen to use.
///
/// Checked in declaration order; the first match wins.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterEnvelope {
    /// `[ {...}, {...} ]`
    Bare(Vec<Value>),
    /// `{ "data": [ ... ] }`
    Data(Vec<Value>),
    /// `{ "<any key>": [ ... ], ... }` where the first value is a list
    FirstField(Vec<Value>),
    /// Any other object: its values are taken as the candidates.
    Values(Vec<Value>),
    /// Null, numbers, strings and booleans.
    Unrecognized,
}

impl RosterEnvelope {
    pub fn classify(raw: Value) -> Self {
        match raw {
            Value::Array(items) => RosterEnvelope::Bare(items),
            Value::Object(mut fields) => {
                if matches!(fields.get("data"), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = fields.remove("data") {
                        return RosterEnvelope::Data(items);
                    }
                }

                let mut values = fields.into_iter().map(|(_, value)| value).peekable();
                if let Some(Value::Array(_)) = values.peek() {
                    if let Some(Value::Array(items)) = values.next() {
                        return RosterEnvelope::FirstField(items);
                    }
                }

                RosterEnvelope::Values(values.collect())
            }
            _ => RosterEnvelope::Unrecognized,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RosterEnvelope::Bare(_) => "bare",
            RosterEnvelope::Data(_) => "data",
            RosterEnvelope::FirstField(_) => "first_field",
            RosterEnvelope::Values(_) => "values",
            RosterEnvelope::Unrecognized => "unrecognized",
        }
    }

    /// Candidate count preserved: a candidate that is not an object becomes
    /// an all-absent record.
    pub fn into_records(self) -> Vec<EmployeeRecord> {
        let candidates = match self {
            RosterEnvelope::Bare(items)
            | RosterEnvelope::Data(items)
            | RosterEnvelope::FirstField(items)
            | RosterEnvelope::Values(items) => items,
            RosterEnvelope::Unrecognized => return Vec::new(),
        };

        let mut malformed = 0usize;
        let records: Vec<EmployeeRecord> = candidates
            .into_iter()
            .map(|candidate| {
                EmployeeRecord::from_candidate(candidate).unwrap_or_else(|| {
                    malformed += 1;
                    EmployeeRecord::default()
                })
            })
            .collect();

        if malformed > 0 {
            warn!(malformed, total = records.len(), "Roster contained non-object records");
        }

        records
    }
}

/// Flatten any decoded roster body into a list of records.
///
/// Never fails: shapes that carry no list produce an empty result.
pub fn normalize(raw: Value) -> Vec<EmployeeRecord> {
    let envelope = RosterEnvelope::classify(raw);
    debug!(envelope = envelope.kind(), "Classified roster envelope");
    envelope.into_records()
}
