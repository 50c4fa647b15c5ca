//! The materialized property sheet
//!
//! These types are what the downstream matcher consumes. They serialize
//! with `serde` to the JSON shape the matcher loads:
//!
//! ```json
//! [ { "selector": { "swVersion": { "type": "fuzzy",
//!                                  "regex": "v(\\d+(?:[.]\\d+)*)",
//!                                  "smatch": { "1": { "check": "version", ">=": "1.2" } } } },
//!     "props": { "timeout": 30, "enabled": true } } ]
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::version::VersionAssertionSet;

/// Ordered list of entries, in declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Document {
    pub entries: Vec<Entry>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The document as a JSON value
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// One selector and the props it applies
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Entry {
    pub selector: BTreeMap<String, Matcher>,
    pub props: BTreeMap<String, Value>,
}

/// A condition on one candidate property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Matcher {
    /// Literal equality
    Exact { value: String },
    /// Regex match with version checks on selected capture groups
    Fuzzy {
        /// The rewritten pattern, with version groups replaced by plain groups
        #[serde(rename = "regex")]
        pattern: String,
        /// Assertions keyed by capture group number
        #[serde(rename = "smatch")]
        assertions: BTreeMap<u32, VersionAssertionSet>,
    },
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
