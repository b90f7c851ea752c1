//! Redirect rules and exact-match lookup.
//!
//! # Responsibilities
//! - Build a validated `RuleSet` from untrusted, untyped input
//! - Answer exact-match lookups against canonical request keys
//! - Convert a `RuleSet` back into its editing form
//!
//! # Design Decisions
//! - Invalid records are dropped, never reported as errors
//! - Input order is kept and duplicate keys are retained
//! - First match wins: lookup is an ordered O(n) scan
//! - Case-sensitive ordinal comparison, no trimming

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::routing::destination::sanitize_destination;
use crate::routing::normalize::normalize;

/// A single redirect rule.
///
/// Serializes as `{"key": ..., "destination": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    key: String,
    destination: String,
}

impl Rule {
    /// Canonical request key, always starting with `/`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Redirect target.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// Editing form of a rule: `{"from": ..., "to": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RuleRecord {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl RuleRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered, validated collection of rules.
///
/// Only [`RuleSet::sanitize`] produces one, so every rule has a non-empty
/// canonical key and a non-empty cleaned destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a rule set from untrusted input.
    ///
    /// Anything other than an array yields an empty set. Each element must be
    /// an object with non-empty `from` and `to` fields (`key` and
    /// `destination` are accepted in their place); elements that fail
    /// validation are skipped.
    pub fn sanitize(raw: &Value) -> Self {
        let Some(records) = raw.as_array() else {
            tracing::debug!("Rule input is not a list, using empty rule set");
            return Self::empty();
        };

        let rules: Vec<Rule> = records
            .iter()
            .filter_map(Value::as_object)
            .filter_map(sanitize_record)
            .collect();

        if rules.len() != records.len() {
            tracing::debug!(
                received = records.len(),
                accepted = rules.len(),
                "Dropped invalid redirect rules"
            );
        }

        Self { rules }
    }

    /// Sanitize a list of typed editing records.
    pub fn from_records(records: &[RuleRecord]) -> Self {
        let rules = records
            .iter()
            .filter_map(|r| build_rule(&r.from, &r.to))
            .collect();
        Self { rules }
    }

    /// Destination of the first rule matching `request`.
    ///
    /// `request` is normalized before comparison, so raw request paths may be
    /// passed directly.
    pub fn lookup(&self, request: &str) -> Option<&str> {
        let key = normalize(request);
        if key.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.key == key)
            .map(|rule| rule.destination.as_str())
    }

    /// Editing form of the set, in stored order.
    pub fn to_records(&self) -> Vec<RuleRecord> {
        self.rules
            .iter()
            .map(|r| RuleRecord::new(r.key.clone(), r.destination.clone()))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn sanitize_record(record: &Map<String, Value>) -> Option<Rule> {
    let from = text_field(record, "from", "key");
    let to = text_field(record, "to", "destination");
    build_rule(&from, &to)
}

fn build_rule(from: &str, to: &str) -> Option<Rule> {
    if from.is_empty() || to.is_empty() {
        return None;
    }

    let destination = sanitize_destination(to);
    if destination.is_empty() {
        return None;
    }

    let key = normalize(from);
    if key.is_empty() {
        return None;
    }

    Some(Rule { key, destination })
}

/// Read a field as text. Strings and numbers are accepted; anything else,
/// or a missing field, reads as empty.
fn text_field(record: &Map<String, Value>, name: &str, fallback: &str) -> String {
    match record.get(name).or_else(|| record.get(fallback)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
