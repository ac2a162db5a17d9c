//! Deterministic failure witnesses and conformance reports.
//!
//! Every failure the conformance harness observes is reported as a witness
//! whose ID depends only on what failed and where:
//!
//! 1. Build the canonical key `{schema, class, context}`
//! 2. Serialize it canonically: sorted keys, no whitespace
//! 3. `witnessId = "w1_" || base32hex_lower(SHA256(keyBytes))`
//!
//! Re-running the same case yields the same ID, so reports from separate
//! runs can be diffed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute a witness ID from a failure class and its context.
pub fn compute_witness_id(class: &str, context: Option<&Value>) -> String {
    let mut key = serde_json::Map::new();
    key.insert("schema".to_string(), Value::Number(1.into()));
    key.insert("class".to_string(), Value::String(class.to_string()));
    key.insert(
        "context".to_string(),
        context.cloned().unwrap_or(Value::Null),
    );
    let bytes = canonical_bytes(&Value::Object(key));
    format!("w1_{}", base32hex_lower(&Sha256::digest(&bytes)))
}

/// Canonical JSON: object keys sorted, no insignificant whitespace.
fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_canonical(value, &mut buf);
    buf
}

fn write_canonical(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_canonical(item, buf);
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            buf.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_scalar(&Value::String(key.clone()), buf);
                buf.push(b':');
                write_canonical(&map[key], buf);
            }
            buf.push(b'}');
        }
        scalar => write_scalar(scalar, buf),
    }
}

fn write_scalar(value: &Value, buf: &mut Vec<u8>) {
    // Scalars never fail to serialize.
    buf.extend(serde_json::to_vec(value).unwrap_or_default());
}

/// RFC 4648 base32hex, lowercase, unpadded.
fn base32hex_lower(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

    let mut out = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut bits: u64 = 0;
    let mut pending: u32 = 0;
    for &byte in data {
        bits = (bits << 8) | u64::from(byte);
        pending += 8;
        while pending >= 5 {
            pending -= 5;
            out.push(ALPHABET[((bits >> pending) & 0x1f) as usize] as char);
        }
    }
    if pending > 0 {
        out.push(ALPHABET[((bits << (5 - pending)) & 0x1f) as usize] as char);
    }
    out
}

/// One observed failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreWitness {
    pub witness_id: String,

    /// Failure classification (see [`crate::error::failure_class`]).
    pub class: String,

    pub message: String,

    /// The case the failure was observed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Expected vs. observed detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl StoreWitness {
    pub fn new(class: impl Into<String>, message: impl Into<String>, context: Option<Value>) -> Self {
        let class = class.into();
        let witness_id = compute_witness_id(&class, context.as_ref());
        Self {
            witness_id,
            class,
            message: message.into(),
            context,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    fn sort_key(&self) -> (&str, String, &str) {
        (
            &self.class,
            self.context
                .as_ref()
                .map(|c| String::from_utf8_lossy(&canonical_bytes(c)).into_owned())
                .unwrap_or_default(),
            &self.witness_id,
        )
    }
}

impl PartialOrd for StoreWitness {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StoreWitness {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Result of a conformance run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceReport {
    /// Schema version (always 1).
    pub witness_schema: u32,

    pub profile: String,

    /// "accepted" or "rejected".
    pub result: String,

    /// Cases whose stores were actually attempted.
    pub executed: usize,

    /// Cases skipped as not applicable.
    pub skipped: usize,

    pub failures: Vec<StoreWitness>,
}

impl ConformanceReport {
    /// Build a report; accepted exactly when `failures` is empty.
    ///
    /// Failures are sorted and exact duplicates (same witness ID) collapsed,
    /// so repeated invocations of a failing case report it once.
    pub fn new(
        profile: impl Into<String>,
        executed: usize,
        skipped: usize,
        mut failures: Vec<StoreWitness>,
    ) -> Self {
        failures.sort();
        failures.dedup_by(|a, b| a.witness_id == b.witness_id);
        let result = if failures.is_empty() { "accepted" } else { "rejected" };
        Self {
            witness_schema: 1,
            profile: profile.into(),
            result: result.to_string(),
            executed,
            skipped,
            failures,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result == "accepted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn witness_id_is_deterministic() {
        let ctx = json!({"arrayKind": "interface", "valueKind": "identity"});
        let a = compute_witness_id("store_incompatible", Some(&ctx));
        let b = compute_witness_id("store_incompatible", Some(&ctx));
        assert_eq!(a, b);
        assert!(a.starts_with("w1_"));
        // 256 bits -> 52 base32 digits
        assert_eq!(a.len(), 3 + 52);
    }

    #[test]
    fn witness_id_ignores_key_order() {
        let a = json!({"arrayKind": "interface", "index": 1});
        let b: Value = serde_json::from_str(r#"{"index":1,"arrayKind":"interface"}"#).unwrap();
        assert_eq!(
            compute_witness_id("outcome_mismatch", Some(&a)),
            compute_witness_id("outcome_mismatch", Some(&b))
        );
    }

    #[test]
    fn witness_id_sensitivity() {
        let ctx = json!({"index": 1});
        assert_ne!(
            compute_witness_id("outcome_mismatch", Some(&ctx)),
            compute_witness_id("slot_mismatch", Some(&ctx))
        );
        assert_ne!(
            compute_witness_id("outcome_mismatch", Some(&ctx)),
            compute_witness_id("outcome_mismatch", Some(&json!({"index": 2})))
        );
        assert_ne!(
            compute_witness_id("outcome_mismatch", None),
            compute_witness_id("outcome_mismatch", Some(&ctx))
        );
    }

    #[test]
    fn canonical_form_sorts_nested_keys() {
        let value = json!({"b": {"y": 1, "x": [true, null]}, "a": "s"});
        let text = String::from_utf8(canonical_bytes(&value)).unwrap();
        assert_eq!(text, r#"{"a":"s","b":{"x":[true,null],"y":1}}"#);
    }

    #[test]
    fn base32hex_known_vectors() {
        // RFC 4648 §10, lowercased and unpadded.
        assert_eq!(base32hex_lower(b""), "");
        assert_eq!(base32hex_lower(b"f"), "co");
        assert_eq!(base32hex_lower(b"fo"), "cpng");
        assert_eq!(base32hex_lower(b"foo"), "cpnmu");
        assert_eq!(base32hex_lower(b"foob"), "cpnmuog");
        assert_eq!(base32hex_lower(b"fooba"), "cpnmuoj1");
        assert_eq!(base32hex_lower(b"foobar"), "cpnmuoj1e8");
    }

    #[test]
    fn report_sorts_and_collapses_duplicates() {
        let ctx = json!({"index": 1});
        let f1 = StoreWitness::new("slot_mismatch", "m", Some(ctx.clone()));
        let f2 = StoreWitness::new("outcome_mismatch", "m", Some(ctx.clone()));
        let f3 = StoreWitness::new("outcome_mismatch", "m", Some(ctx));

        let report = ConformanceReport::new("sanity", 3, 0, vec![f1, f2, f3]);
        assert!(!report.is_accepted());
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].class, "outcome_mismatch");
        assert_eq!(report.failures[1].class, "slot_mismatch");
    }

    #[test]
    fn accepted_report_serializes_camel_case() {
        let report = ConformanceReport::new("sanity", 10, 4, Vec::new());
        assert!(report.is_accepted());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["witnessSchema"], 1);
        assert_eq!(json["result"], "accepted");
        assert_eq!(json["executed"], 10);
        assert_eq!(json["skipped"], 4);
        assert_eq!(json["failures"], json!([]));
    }
}
