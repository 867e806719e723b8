use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, instrument};

use crate::date::{DateInput, DateSpan};
use crate::entry::{DateRangeEntry, RowId};
use crate::frequency::RowSchedule;

/// How ranges that share a boundary date are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapBoundary {
    /// A range ending on a date and another starting on it overlap.
    #[default]
    Inclusive,
    /// A range may start on the date the previous one ends.
    Exclusive,
}

impl FromStr for OverlapBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inclusive" => Ok(OverlapBoundary::Inclusive),
            "exclusive" => Ok(OverlapBoundary::Exclusive),
            _ => Err(format!("unknown overlap boundary: {}", s)),
        }
    }
}

impl fmt::Display for OverlapBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapBoundary::Inclusive => write!(f, "inclusive"),
            OverlapBoundary::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// Validator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    pub overlap_boundary: OverlapBoundary,
    /// Report non-blank unparsable dates as invalid rather than as missing.
    pub report_malformed_dates: bool,
}

/// A single validation finding for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowError {
    DateRequired,
    StartRequired,
    EndRequired,
    DateInvalid,
    StartInvalid,
    EndInvalid,
    EndBeforeStart,
    PickFrequency,
    SelectDayOfMonth,
    SelectMonthInterval,
    SelectWeekday,
    SelectDay,
    SelectMonth,
    Overlap,
}

impl RowError {
    pub fn message(&self) -> &'static str {
        match self {
            RowError::DateRequired => "Date is required",
            RowError::StartRequired => "Start date is required",
            RowError::EndRequired => "End date is required",
            RowError::DateInvalid => "Date is not a valid date",
            RowError::StartInvalid => "Start date is not a valid date",
            RowError::EndInvalid => "End date is not a valid date",
            RowError::EndBeforeStart => "End date must be on/after start date",
            RowError::PickFrequency => "Pick a frequency",
            RowError::SelectDayOfMonth => "Select day of month",
            RowError::SelectMonthInterval => "Select month interval",
            RowError::SelectWeekday => "Select at least one weekday",
            RowError::SelectDay => "Select day",
            RowError::SelectMonth => "Select month",
            RowError::Overlap => "Overlaps another range",
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for RowError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.message())
    }
}

/// Findings per row, in row order. Rows without findings have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: IndexMap<RowId, Vec<RowError>>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when saving must be refused.
    pub fn has_blocking_errors(&self) -> bool {
        !self.is_empty()
    }

    /// Number of rows with at least one finding.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors_for(&self, id: &RowId) -> Option<&[RowError]> {
        self.errors.get(id).map(Vec::as_slice)
    }

    pub fn messages_for(&self, id: &RowId) -> Vec<&'static str> {
        self.errors_for(id)
            .map(|errors| errors.iter().map(RowError::message).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: &RowId, error: RowError) -> bool {
        self.errors_for(id)
            .is_some_and(|errors| errors.contains(&error))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RowId, &[RowError])> {
        self.errors.iter().map(|(id, errors)| (id, errors.as_slice()))
    }
}

impl Serialize for ValidationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (id, errors) in &self.errors {
            map.serialize_entry(id, errors)?;
        }
        map.end()
    }
}

/// Validates `rows` with default options.
pub fn validate(rows: &[DateRangeEntry]) -> ValidationReport {
    validate_with(rows, &ValidatorOptions::default())
}

/// Checks each row's fields, then every unordered pair of complete ranges for overlap.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn validate_with(rows: &[DateRangeEntry], options: &ValidatorOptions) -> ValidationReport {
    let mut findings: Vec<Vec<RowError>> = rows.iter().map(|row| row_errors(row, options)).collect();

    let spans: Vec<Option<DateSpan>> = rows.iter().map(DateRangeEntry::effective_range).collect();
    for i in 0..spans.len() {
        for j in (i + 1)..spans.len() {
            let (Some(a), Some(b)) = (&spans[i], &spans[j]) else {
                continue;
            };
            let overlaps = match options.overlap_boundary {
                OverlapBoundary::Inclusive => a.overlaps(b),
                OverlapBoundary::Exclusive => a.overlaps_exclusive(b),
            };
            if overlaps {
                findings[i].push(RowError::Overlap);
                findings[j].push(RowError::Overlap);
            }
        }
    }

    let mut errors: IndexMap<RowId, Vec<RowError>> = IndexMap::new();
    for (row, row_findings) in rows.iter().zip(findings) {
        if row_findings.is_empty() {
            continue;
        }
        errors.entry(row.id.clone()).or_default().extend(row_findings);
    }

    debug!(invalid_rows = errors.len(), "validated custom ranges");
    ValidationReport { errors }
}

fn row_errors(row: &DateRangeEntry, options: &ValidatorOptions) -> Vec<RowError> {
    let mut errors = Vec::new();
    let one_time = row.is_one_time();

    let (required, invalid) = if one_time {
        (RowError::DateRequired, RowError::DateInvalid)
    } else {
        (RowError::StartRequired, RowError::StartInvalid)
    };
    if let Some(error) = date_error(&row.start, required, invalid, options) {
        errors.push(error);
    }

    if !one_time {
        if let Some(error) = date_error(&row.end, RowError::EndRequired, RowError::EndInvalid, options) {
            errors.push(error);
        }
    }

    if let Some(span) = row.effective_range() {
        if span.end < span.start {
            errors.push(RowError::EndBeforeStart);
        }
    }

    match &row.schedule {
        RowSchedule::Unrecognized(_) => errors.push(RowError::PickFrequency),
        RowSchedule::Monthly { day, interval } => {
            if day.is_none() {
                errors.push(RowError::SelectDayOfMonth);
            }
            if interval.is_none() {
                errors.push(RowError::SelectMonthInterval);
            }
        }
        RowSchedule::Weekly { days } => {
            if days.is_empty() {
                errors.push(RowError::SelectWeekday);
            }
        }
        RowSchedule::Yearly { day, month } => {
            if day.is_none() {
                errors.push(RowError::SelectDay);
            }
            if month.is_none() {
                errors.push(RowError::SelectMonth);
            }
        }
        RowSchedule::Daily | RowSchedule::Fortnight | RowSchedule::OneTime => {}
    }

    errors
}

/// Blank input is missing; malformed input is missing unless reported separately.
fn date_error(
    input: &DateInput,
    required: RowError,
    invalid: RowError,
    options: &ValidatorOptions,
) -> Option<RowError> {
    if input.is_blank() {
        Some(required)
    } else if input.is_malformed() {
        Some(if options.report_malformed_dates {
            invalid
        } else {
            required
        })
    } else {
        None
    }
}
