//! Loose version ordering
//!
//! Published versions are compared with a tolerant, dot-and-component
//! ordering rather than strict semver: a version string is split into
//! numeric and textual runs, numeric components compare numerically, and a
//! textual component sorts after a numeric one at the same depth (so
//! `1.0.post1` comes after `1.0.1`). The ordering is total and stable,
//! which keeps the candidate search deterministic.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single parsed component of a version string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Component {
    Number(u64),
    Text(String),
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => a.cmp(b),
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            // Textual components sort after numeric ones at the same depth
            (Component::Number(_), Component::Text(_)) => Ordering::Less,
            (Component::Text(_), Component::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A version string with its parsed components
///
/// Keeps the raw string untouched for display and round-tripping; only the
/// parsed components participate in comparison, with the raw string as a
/// final tie-break so the order stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Version {
    raw: String,
    components: Vec<Component>,
}

impl Version {
    /// Parse a version string (parsing never fails; unknown text becomes
    /// textual components)
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let components = tokenize(&raw);
        Self { raw, components }
    }

    /// The original version string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Split a version string into numeric and textual runs
///
/// Dots are separators; within a dot-separated segment, digit runs and
/// non-digit runs become distinct components (`1.0a1` -> 1, 0, "a", 1).
fn tokenize(raw: &str) -> Vec<Component> {
    let mut components = Vec::new();

    for segment in raw.split('.') {
        let mut run = String::new();
        let mut run_is_digit = None;

        for ch in segment.chars() {
            let is_digit = ch.is_ascii_digit();
            if run_is_digit != Some(is_digit) && !run.is_empty() {
                components.push(make_component(&run));
                run.clear();
            }
            run_is_digit = Some(is_digit);
            run.push(ch);
        }

        if !run.is_empty() {
            components.push(make_component(&run));
        }
    }

    components
}

fn make_component(run: &str) -> Component {
    match run.parse::<u64>() {
        Ok(n) => Component::Number(n),
        Err(_) => Component::Text(run.to_string()),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.components.iter().zip(other.components.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        // A strict component-prefix sorts first; equal components fall back
        // to the raw string so the ordering is total and stable
        self.components
            .len()
            .cmp(&other.components.len())
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.raw
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Version::parse(raw)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::parse(raw)
    }
}
