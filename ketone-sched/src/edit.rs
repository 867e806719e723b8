//! Row edits as pure functions from one row value to the next.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::debug;

use crate::date::DateInput;
use crate::entry::DateRangeEntry;
use crate::error::EditError;
use crate::frequency::{DayOfMonth, Frequency, Month, MonthInterval, RowSchedule, Weekday};

/// A single field edit coming from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Start(DateInput),
    End(DateInput),
    Frequency(Frequency),
    /// A frequency token outside the known set; kept so validation can flag it.
    UnrecognizedFrequency(String),
    MonthlyDay(Option<DayOfMonth>),
    MonthlyInterval(Option<MonthInterval>),
    WeeklyDays(BTreeSet<Weekday>),
    ToggleWeekday(Weekday),
    YearlyDay(Option<DayOfMonth>),
    YearlyMonth(Option<Month>),
}

impl FieldUpdate {
    /// Builds an update from a form field name and its raw value.
    ///
    /// Blank or unparsable sub-field values become "unset" so the validator
    /// reports them as missing. Weekday lists are comma or whitespace separated;
    /// unknown tokens in them are dropped.
    pub fn parse(field: &str, raw: &str) -> Result<Self, EditError> {
        let update = match field {
            "start" => FieldUpdate::Start(DateInput::new(raw)),
            "end" => FieldUpdate::End(DateInput::new(raw)),
            "freq" | "frequency" => match raw.parse::<Frequency>() {
                Ok(frequency) => FieldUpdate::Frequency(frequency),
                Err(_) => FieldUpdate::UnrecognizedFrequency(raw.to_string()),
            },
            "monthlyDay" | "monthly_day" => FieldUpdate::MonthlyDay(optional(field, raw)),
            "monthlyInterval" | "monthlyIntervalMonths" | "monthly_interval" => {
                FieldUpdate::MonthlyInterval(optional(field, raw))
            }
            "weeklyDays" | "weekly_days" => FieldUpdate::WeeklyDays(parse_weekdays(raw)),
            "yearlyDay" | "yearly_day" => FieldUpdate::YearlyDay(optional(field, raw)),
            "yearlyMonth" | "yearly_month" => FieldUpdate::YearlyMonth(optional(field, raw)),
            other => return Err(EditError::UnknownField(other.to_string())),
        };
        Ok(update)
    }
}

pub(crate) fn optional<T: FromStr>(field: &str, raw: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(field, raw, %err, "treating unparsable value as unset");
            None
        }
    }
}

/// Parses a comma or whitespace separated weekday list, dropping unknown tokens.
pub fn parse_weekdays(raw: &str) -> BTreeSet<Weekday> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<Weekday>() {
            Ok(day) => Some(day),
            Err(err) => {
                debug!(%err, "dropping weekday token");
                None
            }
        })
        .collect()
}

/// Applies `update` to a copy of `row` and returns the copy.
pub fn apply_field_update(row: &DateRangeEntry, update: FieldUpdate) -> DateRangeEntry {
    match update {
        FieldUpdate::Start(start) => on_start_change(row, start),
        FieldUpdate::Frequency(frequency) => on_frequency_change(row, frequency),
        FieldUpdate::UnrecognizedFrequency(token) => DateRangeEntry {
            schedule: RowSchedule::Unrecognized(token),
            ..row.clone()
        },
        FieldUpdate::End(end) => {
            if row.is_one_time() {
                debug!(id = %row.id, "ignoring end date edit on one-time range");
                return row.clone();
            }
            DateRangeEntry {
                end,
                ..row.clone()
            }
        }
        other => apply_schedule_field(row, other),
    }
}

/// Switches the row's frequency; a one-time row gets `end := start`.
///
/// Re-selecting the current frequency keeps the existing sub-fields.
pub fn on_frequency_change(row: &DateRangeEntry, frequency: Frequency) -> DateRangeEntry {
    let mut next = row.clone();
    if row.frequency() != Some(frequency) {
        next.schedule = RowSchedule::for_frequency(frequency);
    }
    if frequency == Frequency::OneTime {
        next.end = next.start.clone();
    }
    next
}

/// Sets the start date; a one-time row also gets `end := start`.
pub fn on_start_change(row: &DateRangeEntry, start: DateInput) -> DateRangeEntry {
    let mut next = row.clone();
    if row.is_one_time() {
        next.end = start.clone();
    }
    next.start = start;
    next
}

/// Adds `day` to a weekly row's days, or removes it if already present.
pub fn toggle_weekday(row: &DateRangeEntry, day: Weekday) -> DateRangeEntry {
    apply_field_update(row, FieldUpdate::ToggleWeekday(day))
}

fn apply_schedule_field(row: &DateRangeEntry, update: FieldUpdate) -> DateRangeEntry {
    let mut next = row.clone();
    let applied = match (&mut next.schedule, update) {
        (RowSchedule::Monthly { day, .. }, FieldUpdate::MonthlyDay(value)) => {
            *day = value;
            true
        }
        (RowSchedule::Monthly { interval, .. }, FieldUpdate::MonthlyInterval(value)) => {
            *interval = value;
            true
        }
        (RowSchedule::Weekly { days }, FieldUpdate::WeeklyDays(value)) => {
            *days = value;
            true
        }
        (RowSchedule::Weekly { days }, FieldUpdate::ToggleWeekday(day)) => {
            if !days.remove(&day) {
                days.insert(day);
            }
            true
        }
        (RowSchedule::Yearly { day, .. }, FieldUpdate::YearlyDay(value)) => {
            *day = value;
            true
        }
        (RowSchedule::Yearly { month, .. }, FieldUpdate::YearlyMonth(value)) => {
            *month = value;
            true
        }
        _ => false,
    };
    if !applied {
        debug!(id = %row.id, "field does not apply to the range's frequency");
    }
    next
}
