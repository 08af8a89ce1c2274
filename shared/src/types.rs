//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Supported languages for reason messages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Norwegian,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Norwegian => "no",
        }
    }

    /// Parse a language code, accepting the common Norwegian variants.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "no" | "nb" | "nn" | "norwegian" => Some(Language::Norwegian),
            _ => None,
        }
    }
}

/// Go/no-go result for a day or a whole forecast
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Positive,
    #[default]
    Negative,
}

impl Verdict {
    pub fn is_positive(&self) -> bool {
        matches!(self, Verdict::Positive)
    }
}

impl From<bool> for Verdict {
    fn from(positive: bool) -> Self {
        if positive {
            Verdict::Positive
        } else {
            Verdict::Negative
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Positive => write!(f, "positive"),
            Verdict::Negative => write!(f, "negative"),
        }
    }
}

/// Inclusive range of local hours-of-day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourRange {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl HourRange {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }

    /// Number of hours covered by the range (0 when start > end)
    pub fn len(&self) -> u32 {
        if self.start_hour > self.end_hour {
            0
        } else {
            self.end_hour - self.start_hour + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 20,
        }
    }
}
