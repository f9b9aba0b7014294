//! Culture and model labels guessed from file names.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cultural background under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Culture {
    Chinese,
    German,
    Swedish,
    American,
    Unknown,
}

impl Culture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Culture::Chinese => "Chinese",
            Culture::German => "German",
            Culture::Swedish => "Swedish",
            Culture::American => "American",
            Culture::Unknown => "Unknown",
        }
    }

    /// Two-letter code for a known culture name; `None` for anything else.
    pub fn code_for(name: &str) -> Option<&'static str> {
        match name {
            "Chinese" => Some("CN"),
            "American" => Some("US"),
            "German" => Some("DE"),
            "Swedish" => Some("SE"),
            _ => None,
        }
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI system under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    Claude4,
    Gpt4,
    DeepSeekV3,
    Gemini25,
    Unknown,
}

impl ModelFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Claude4 => "Claude-4",
            ModelFamily::Gpt4 => "GPT-4",
            ModelFamily::DeepSeekV3 => "DeepSeek-V3",
            ModelFamily::Gemini25 => "Gemini-2.5",
            ModelFamily::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Word boundaries follow regex semantics, so `_` counts as a word character:
// "cn_run" does not match `\bcn\b`.
static CN_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcn\b").unwrap());
static DE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bde(_|\b)").unwrap());
static US_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bus\b").unwrap());

static MODEL_PATTERNS: Lazy<Vec<(Regex, ModelFamily)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"claude[-_ ]?4|sonnet\s*4").unwrap(), ModelFamily::Claude4),
        (Regex::new(r"gpt[-_ ]?4(\.1)?|gpt4").unwrap(), ModelFamily::Gpt4),
        (Regex::new(r"deepseek[-_ ]?v?3").unwrap(), ModelFamily::DeepSeekV3),
        (Regex::new(r"gemini[-_ ]?2\.5").unwrap(), ModelFamily::Gemini25),
    ]
});

/// Culture and model guessed from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameGuess {
    pub culture: Culture,
    pub model: ModelFamily,
}

/// Guess labels from the base name of `path`.
///
/// Matching is on the lower-cased base name; the first pattern in priority
/// order wins on each axis.
pub fn guess_labels(path: impl AsRef<Path>) -> FilenameGuess {
    let base = path
        .as_ref()
        .file_name()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    FilenameGuess {
        culture: guess_culture(&base),
        model: guess_model(&base),
    }
}

fn guess_culture(base: &str) -> Culture {
    if base.contains("china") || CN_WORD.is_match(base) {
        Culture::Chinese
    } else if base.contains("german") || DE_WORD.is_match(base) {
        Culture::German
    } else if base.contains("swed") || base.contains("se_") {
        Culture::Swedish
    } else if US_WORD.is_match(base) || base.contains("usa") || base.contains("american") {
        Culture::American
    } else {
        Culture::Unknown
    }
}

fn guess_model(base: &str) -> ModelFamily {
    MODEL_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(base))
        .map(|(_, model)| *model)
        .unwrap_or(ModelFamily::Unknown)
}
