use thiserror::Error;

use crate::entry::RowId;
use crate::validate::ValidationReport;

/// Failure to interpret a form token as one of the recurrence types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown frequency: {0}")]
    UnknownFrequency(String),

    #[error("unknown job mode: {0}")]
    UnknownMode(String),

    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("unknown month: {0}")]
    UnknownMonth(String),

    #[error("day of month must be between 1 and 31, got {0}")]
    DayOutOfRange(u32),

    #[error("month interval must be between 1 and 12, got {0}")]
    IntervalOutOfRange(u32),

    #[error("not a number: {0}")]
    NotANumber(String),
}

/// Error type for row collection edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("row not found: {0}")]
    UnknownRow(RowId),

    #[error("cannot remove the last custom range")]
    LastRow,

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Error returned when a draft cannot be turned into a save payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("{} range(s) have validation issues", .0.len())]
    Blocked(ValidationReport),
}

/// Error type for loading a raw form into a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("duplicate row id: {0}")]
    DuplicateRowId(RowId),

    #[error("range {index}: {source}")]
    Range {
        index: usize,
        #[source]
        source: EditError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
