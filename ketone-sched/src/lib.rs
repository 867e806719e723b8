//! Ketone Scheduling - job recurrence model and custom date-range validation
//!
//! A job either recurs in a fixed mode (daily, weekly, monthly, yearly) or in
//! Custom mode, where the user lists date ranges that each carry their own
//! frequency. This crate holds the form state for such a job, applies edits
//! to it, validates the custom ranges and derives the record that is saved.
//!
//! # Example
//!
//! ```
//! use ketone_sched::{FieldUpdate, JobMode, RowError, ScheduleDraft, SequentialIds, ValidatorOptions};
//!
//! let mut draft = ScheduleDraft::new(SequentialIds::new());
//! draft.set_mode(JobMode::Custom);
//!
//! let id = draft.rows()[0].id.clone();
//! draft.update_field(&id, "start", "2024-06-01").unwrap();
//! draft.update_field(&id, "end", "2024-06-07").unwrap();
//!
//! let report = draft.validate(&ValidatorOptions::default());
//! assert_eq!(report.errors_for(&id), Some(&[RowError::SelectWeekday][..]));
//! ```

pub mod date;
pub mod draft;
pub mod edit;
pub mod entry;
pub mod error;
pub mod form;
pub mod frequency;
pub mod payload;
pub mod selection;
pub mod validate;

pub use date::{DateInput, DateSpan};
pub use draft::ScheduleDraft;
pub use edit::{apply_field_update, on_frequency_change, on_start_change, parse_weekdays, toggle_weekday, FieldUpdate};
pub use entry::{next_unused_id, DateRangeEntry, IdGenerator, RandomIds, RowId, SequentialIds};
pub use error::{EditError, FormError, ParseError, SaveError};
pub use form::{DraftForm, FormValue, RangeForm};
pub use frequency::{DayOfMonth, Frequency, Month, MonthInterval, RowSchedule, Weekday};
pub use payload::{build_payload, MonthlyRecord, RangeRecord, SavePayload, WeeklyRecord, YearlyRecord};
pub use selection::{JobFrequencySelection, JobMode};
pub use validate::{validate, validate_with, OverlapBoundary, RowError, ValidationReport, ValidatorOptions};
