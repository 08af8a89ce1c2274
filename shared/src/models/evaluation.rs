//! Scoring results: per-hour reasons and per-day verdicts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::forecast::{MergedHourlyRecord, PressureLevel};
use crate::types::{Language, Verdict};

/// Why an hour is not flyable
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Dark,
    BadWeather,
    WrongWindDirection,
    TooLittleWind,
    TooMuchWind,
    TooMuchInGusts,
    BlowingTooMuch,
    Raining,
    CapeTooHigh,
    LiftedIndexTooLow,
    LiftedIndexTooHigh,
    ConvectiveInhibitionTooLow,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::Dark => "it is dark",
            FailureReason::BadWeather => "bad weather",
            FailureReason::WrongWindDirection => "wrong wind direction",
            FailureReason::TooLittleWind => "too little wind",
            FailureReason::TooMuchWind => "too much wind",
            FailureReason::TooMuchInGusts => "too much in the gusts",
            FailureReason::BlowingTooMuch => "blowing too much",
            FailureReason::Raining => "raining",
            FailureReason::CapeTooHigh => "CAPE is too high",
            FailureReason::LiftedIndexTooLow => "lifted index is too low",
            FailureReason::LiftedIndexTooHigh => "lifted index is too high",
            FailureReason::ConvectiveInhibitionTooLow => "convective inhibition is too low",
        }
    }

    pub fn message_no(&self) -> &'static str {
        match self {
            FailureReason::Dark => "Det er mørkt.",
            FailureReason::BadWeather => "Det er dårlig vær.",
            FailureReason::WrongWindDirection => "Vindretningen er feil.",
            FailureReason::TooLittleWind => "Det er for lite vind.",
            FailureReason::TooMuchWind => "Det er for mye vind.",
            FailureReason::TooMuchInGusts => "Det er for mye i kastene.",
            FailureReason::BlowingTooMuch => "Det blåser for mye.",
            FailureReason::Raining => "Det regner.",
            FailureReason::CapeTooHigh => "CAPE er for høy.",
            FailureReason::LiftedIndexTooLow => "Lifted Index er for lav.",
            FailureReason::LiftedIndexTooHigh => "Lifted Index er for høy.",
            FailureReason::ConvectiveInhibitionTooLow => "Konvektiv inhibisjon ligger for lavt.",
        }
    }

    pub fn message_in(&self, language: Language) -> String {
        match language {
            Language::English => self.message().to_string(),
            Language::Norwegian => self.message_no().to_string(),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Something worth knowing about an hour that does not rule it out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum WarningReason {
    RainPossible,
    StrongWindAloft {
        level: PressureLevel,
        height_m: f64,
    },
    WindShear {
        level: PressureLevel,
        height_m: f64,
    },
}

impl WarningReason {
    pub fn message(&self) -> String {
        match self {
            WarningReason::RainPossible => "rain possible".to_string(),
            WarningReason::StrongWindAloft { height_m, .. } => {
                format!("strong wind aloft ({:.0}m)", height_m)
            }
            WarningReason::WindShear { height_m, .. } => {
                format!("wind direction changes aloft ({:.0}m)", height_m)
            }
        }
    }

    pub fn message_no(&self) -> String {
        match self {
            WarningReason::RainPossible => "Det kan komme regn".to_string(),
            WarningReason::StrongWindAloft { height_m, .. } => {
                format!("Mye høydevind ({:.0}m)", height_m)
            }
            WarningReason::WindShear { height_m, .. } => {
                format!("Endring i vindretning ({:.0}m)", height_m)
            }
        }
    }

    pub fn message_in(&self, language: Language) -> String {
        match language {
            Language::English => self.message(),
            Language::Norwegian => self.message_no(),
        }
    }
}

impl std::fmt::Display for WarningReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A merged hour with its verdict and the reasons behind it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluatedHour {
    #[serde(flatten)]
    pub record: MergedHourlyRecord,
    pub is_promising: bool,
    pub validation_failures: Vec<FailureReason>,
    pub validation_warnings: Vec<WarningReason>,
}

impl EvaluatedHour {
    pub fn failure_messages(&self, language: Language) -> Vec<String> {
        self.validation_failures
            .iter()
            .map(|r| r.message_in(language))
            .collect()
    }

    pub fn warning_messages(&self, language: Language) -> Vec<String> {
        self.validation_warnings
            .iter()
            .map(|r| r.message_in(language))
            .collect()
    }

    /// Failures joined with commas, as rendered next to each hour
    pub fn joined_failures(&self, language: Language) -> String {
        self.failure_messages(language).join(",")
    }

    pub fn joined_warnings(&self, language: Language) -> String {
        self.warning_messages(language).join(",")
    }
}

/// Result for one local calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayVerdict {
    pub date: NaiveDate,
    pub result: Verdict,
    /// Hours inside the flyable window, in forecast order
    pub hours: Vec<EvaluatedHour>,
}

/// Result across every day of a forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ForecastVerdict {
    pub overall: Verdict,
    pub days: Vec<DayVerdict>,
}

impl ForecastVerdict {
    pub fn positive_days(&self) -> impl Iterator<Item = &DayVerdict> {
        self.days.iter().filter(|d| d.result.is_positive())
    }
}
