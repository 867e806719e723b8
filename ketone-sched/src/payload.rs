//! Plain records handed to persistence once a draft is accepted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::date::DateInput;
use crate::entry::DateRangeEntry;
use crate::error::SaveError;
use crate::frequency::{DayOfMonth, Frequency, Month, MonthInterval, RowSchedule, Weekday};
use crate::selection::{JobFrequencySelection, JobMode};
use crate::validate::{validate_with, ValidatorOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub day: Option<DayOfMonth>,
    pub interval_months: Option<MonthInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    pub days: BTreeSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub day: Option<DayOfMonth>,
    pub month: Option<Month>,
}

/// One saved custom range; `end` is the effective end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRecord {
    pub start: DateInput,
    pub end: DateInput,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<MonthlyRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WeeklyRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly: Option<YearlyRecord>,
}

impl RangeRecord {
    /// `None` for a row whose frequency is not recognized.
    pub fn from_entry(row: &DateRangeEntry) -> Option<Self> {
        let frequency = row.frequency()?;
        let mut record = RangeRecord {
            start: row.start.clone(),
            end: row.effective_end().clone(),
            frequency,
            monthly: None,
            weekly: None,
            yearly: None,
        };
        match &row.schedule {
            RowSchedule::Monthly { day, interval } => {
                record.monthly = Some(MonthlyRecord {
                    day: *day,
                    interval_months: *interval,
                });
            }
            RowSchedule::Weekly { days } => {
                record.weekly = Some(WeeklyRecord { days: days.clone() });
            }
            RowSchedule::Yearly { day, month } => {
                record.yearly = Some(YearlyRecord {
                    day: *day,
                    month: *month,
                });
            }
            _ => {}
        }
        Some(record)
    }
}

/// Save payload for either a fixed-mode job or a custom-range job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub job_frequency: JobMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<MonthlyRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WeeklyRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly: Option<YearlyRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_ranges: Option<Vec<RangeRecord>>,
}

impl SavePayload {
    /// Payload for a non-Custom selection, carrying only the active mode's fields.
    pub fn for_selection(selection: &JobFrequencySelection) -> Self {
        let mut payload = SavePayload {
            job_frequency: selection.mode,
            monthly: None,
            weekly: None,
            yearly: None,
            custom_ranges: None,
        };
        match selection.mode {
            JobMode::Monthly => {
                payload.monthly = Some(MonthlyRecord {
                    day: selection.monthly_day,
                    interval_months: selection.monthly_interval,
                });
            }
            JobMode::Weekly => {
                payload.weekly = Some(WeeklyRecord {
                    days: selection.weekly_days.clone(),
                });
            }
            JobMode::Yearly => {
                payload.yearly = Some(YearlyRecord {
                    day: selection.yearly_day,
                    month: selection.yearly_month,
                });
            }
            JobMode::Daily | JobMode::Custom => {}
        }
        payload
    }
}

/// Builds the payload for `selection`, refusing custom ranges that fail validation.
///
/// Fixed modes are never gated.
#[instrument(skip_all, fields(mode = %selection.mode))]
pub fn build_payload(
    selection: &JobFrequencySelection,
    rows: &[DateRangeEntry],
    options: &ValidatorOptions,
) -> Result<SavePayload, SaveError> {
    if !selection.is_custom() {
        return Ok(SavePayload::for_selection(selection));
    }

    let report = validate_with(rows, options);
    if report.has_blocking_errors() {
        debug!(invalid_rows = report.len(), "save blocked");
        return Err(SaveError::Blocked(report));
    }

    // A clean report rules out unrecognized frequencies.
    let ranges = rows.iter().filter_map(RangeRecord::from_entry).collect();
    Ok(SavePayload {
        job_frequency: JobMode::Custom,
        monthly: None,
        weekly: None,
        yearly: None,
        custom_ranges: Some(ranges),
    })
}
