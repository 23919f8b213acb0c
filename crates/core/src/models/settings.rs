use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How finely the historical series is dated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One observation per calendar day; dates must match exactly.
    #[default]
    Daily,
    /// One observation per month, dated the 1st. Any day in a month
    /// resolves to that month's observation.
    Monthly,
}

impl Granularity {
    /// Map a calendar day onto the key the repository stores and looks up.
    pub fn normalize(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Monthly => date.with_day(1).unwrap_or(date),
        }
    }
}

/// What to do when two observations in one series land on the same normalized date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse the whole load with `InvalidObservation`.
    #[default]
    Reject,
    /// Keep the observation that appears later in the input.
    LastWriteWins,
}

/// Repository settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub granularity: Granularity,

    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl Settings {
    pub fn monthly() -> Self {
        Self {
            granularity: Granularity::Monthly,
            ..Self::default()
        }
    }
}
