use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the analysis prompt is written in.
///
/// The model usually answers in the language it is asked in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    Indonesian,
    English,
}

impl FromStr for PromptLanguage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" | "indonesian" | "bahasa" => Ok(PromptLanguage::Indonesian),
            "en" | "english" => Ok(PromptLanguage::English),
            other => Err(format!("Unsupported prompt language: {}", other)),
        }
    }
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptLanguage::Indonesian => f.write_str("indonesian"),
            PromptLanguage::English => f.write_str("english"),
        }
    }
}
