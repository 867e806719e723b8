use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text of a date field exactly as entered; may be blank or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateInput(String);

impl DateInput {
    pub fn new(raw: impl Into<String>) -> Self {
        DateInput(raw.into())
    }

    pub fn blank() -> Self {
        DateInput(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parses the input as an ISO calendar date (`YYYY-MM-DD`).
    ///
    /// Returns `None` for blank input, for impossible dates like `2024-02-30`
    /// and for anything not written in exactly that shape (`2024-3-1`,
    /// `+2024-03-01`).
    pub fn parse(&self) -> Option<NaiveDate> {
        if self.is_blank() {
            return None;
        }
        let trimmed = self.0.trim();
        let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()?;
        (date.format(DATE_FORMAT).to_string() == trimmed).then_some(date)
    }

    /// Non-blank input that does not parse.
    pub fn is_malformed(&self) -> bool {
        !self.is_blank() && self.parse().is_none()
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::new(value)
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput(value.format(DATE_FORMAT).to_string())
    }
}

impl fmt::Display for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive span between two parsed dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Inclusive intersection test: spans sharing a single boundary date overlap.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Exclusive variant: a span may start on the date the previous one ends.
    ///
    /// Spans with the same start date still overlap, so two single-day spans
    /// on one date are never accepted.
    pub fn overlaps_exclusive(&self, other: &DateSpan) -> bool {
        if !self.overlaps(other) {
            return false;
        }
        let touches = (self.end == other.start && self.start < other.start)
            || (other.end == self.start && other.start < self.start);
        !touches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(DateInput::from("2024-03-01").parse(), Some(date(2024, 3, 1)));
        assert_eq!(DateInput::from(" 2024-03-01 ").parse(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn rejects_blank_and_malformed() {
        assert!(DateInput::blank().parse().is_none());
        assert!(DateInput::blank().is_blank());
        assert!(!DateInput::blank().is_malformed());

        for raw in [
            "2024-02-30",
            "03/01/2024",
            "tomorrow",
            "2024-13-01",
            "2024-3-1",
            "2024-03-1",
            "+2024-03-01",
        ] {
            let input = DateInput::from(raw);
            assert!(input.parse().is_none(), "{raw} should not parse");
            assert!(input.is_malformed());
        }
    }

    #[test]
    fn formats_naive_date() {
        assert_eq!(DateInput::from(date(2024, 1, 5)).as_str(), "2024-01-05");
    }

    #[test]
    fn span_boundaries() {
        let a = DateSpan {
            start: date(2024, 1, 1),
            end: date(2024, 1, 31),
        };
        let b = DateSpan {
            start: date(2024, 1, 31),
            end: date(2024, 2, 15),
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps_exclusive(&b));
        assert!(!b.overlaps_exclusive(&a));
    }

    #[test]
    fn exclusive_still_rejects_same_day() {
        let day = DateSpan {
            start: date(2024, 5, 1),
            end: date(2024, 5, 1),
        };
        assert!(day.overlaps_exclusive(&day));

        let inner = DateSpan {
            start: date(2024, 1, 10),
            end: date(2024, 1, 20),
        };
        let outer = DateSpan {
            start: date(2024, 1, 1),
            end: date(2024, 1, 31),
        };
        assert!(inner.overlaps_exclusive(&outer));
    }
}
