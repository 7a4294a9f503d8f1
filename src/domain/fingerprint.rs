use serde::{Deserialize, Serialize};
use std::fmt;

pub const FINGERPRINT_PREFIX: &str = "ai-result-";

/// Cache key of the form `ai-result-<i32>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_value(value: i32) -> Self {
        Self(format!("{}{}", FINGERPRINT_PREFIX, value))
    }

    /// Accepts only strings this crate could have produced.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix(FINGERPRINT_PREFIX)?;
        let value = digits.parse::<i32>().ok()?;
        // Reject "+5", "007" and similar spellings of the same number.
        if value.to_string() != digits {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn value(&self) -> i32 {
        self.0
            .strip_prefix(FINGERPRINT_PREFIX)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Fingerprint::parse(&raw).ok_or_else(|| format!("not a result fingerprint: {:?}", raw))
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
