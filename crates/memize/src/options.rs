//! Memoization options
//!
//! Configuration is permissive: a bound that is zero, negative, fractional
//! below one, or not a number at all leaves the cache unbounded instead of
//! raising an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;

/// Options accepted when wrapping a function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Options {
    /// Maximum number of records kept; `None` is unbounded
    #[serde(default, alias = "maxSize", deserialize_with = "permissive_bound")]
    pub max_size: Option<usize>,
}

impl Options {
    /// Unbounded options
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Options bounded to `max_size` records; zero means unbounded
    pub fn max_size(max_size: usize) -> Self {
        Self {
            max_size: (max_size > 0).then_some(max_size),
        }
    }

    /// Parse options from a JSON document such as `{"max_size": 100}`
    ///
    /// # Returns
    /// * `Result<Options>` - Error only if the document is not valid JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check whether no bound is configured
    pub fn is_unbounded(&self) -> bool {
        self.max_size.is_none()
    }
}

fn permissive_bound<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(bound_from_value(&value))
}

fn bound_from_value(value: &Value) -> Option<usize> {
    let Value::Number(n) = value else {
        return None;
    };

    if let Some(n) = n.as_u64() {
        return usize::try_from(n).ok().filter(|&n| n > 0);
    }

    // A fractional bound of 2.5 stops growth at 2 records.
    match n.as_f64() {
        Some(f) if f >= 1.0 && f.is_finite() => Some(f.floor() as usize),
        _ => None,
    }
}
