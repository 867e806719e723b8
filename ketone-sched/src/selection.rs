use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::frequency::{DayOfMonth, Month, MonthInterval, Weekday};

/// Top-level job frequency mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Frequency is given by the custom date ranges.
    Custom,
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Daily => "Daily",
            JobMode::Weekly => "Weekly",
            JobMode::Monthly => "Monthly",
            JobMode::Yearly => "Yearly",
            JobMode::Custom => "Custom",
        }
    }
}

impl FromStr for JobMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Daily" => Ok(JobMode::Daily),
            "Weekly" => Ok(JobMode::Weekly),
            "Monthly" => Ok(JobMode::Monthly),
            "Yearly" => Ok(JobMode::Yearly),
            "Custom" => Ok(JobMode::Custom),
            other => Err(ParseError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The job's mode plus the single set of sub-fields used outside Custom mode.
///
/// All sub-fields are kept while the mode changes, so switching back restores
/// what was picked before. Only the active mode's fields end up in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFrequencySelection {
    pub mode: JobMode,
    pub monthly_day: Option<DayOfMonth>,
    pub monthly_interval: Option<MonthInterval>,
    pub weekly_days: BTreeSet<Weekday>,
    pub yearly_day: Option<DayOfMonth>,
    pub yearly_month: Option<Month>,
}

impl JobFrequencySelection {
    pub fn new(mode: JobMode) -> Self {
        JobFrequencySelection {
            mode,
            ..Self::default()
        }
    }

    pub fn is_custom(&self) -> bool {
        self.mode == JobMode::Custom
    }

    pub fn toggle_weekday(&mut self, day: Weekday) {
        if !self.weekly_days.remove(&day) {
            self.weekly_days.insert(day);
        }
    }
}

impl Default for JobFrequencySelection {
    fn default() -> Self {
        JobFrequencySelection {
            mode: JobMode::default(),
            monthly_day: None,
            monthly_interval: Some(MonthInterval::ONE),
            weekly_days: BTreeSet::new(),
            yearly_day: None,
            yearly_month: None,
        }
    }
}
