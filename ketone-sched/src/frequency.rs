use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Recurrence frequency of a single custom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Fortnight,
    #[serde(rename = "One time", alias = "OneTime")]
    OneTime,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
        Frequency::Fortnight,
        Frequency::OneTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
            Frequency::Fortnight => "Fortnight",
            Frequency::OneTime => "One time",
        }
    }
}

impl FromStr for Frequency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Daily" => Ok(Frequency::Daily),
            "Weekly" => Ok(Frequency::Weekly),
            "Monthly" => Ok(Frequency::Monthly),
            "Yearly" => Ok(Frequency::Yearly),
            "Fortnight" => Ok(Frequency::Fortnight),
            "One time" | "OneTime" => Ok(Frequency::OneTime),
            other => Err(ParseError::UnknownFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of week for weekly recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl FromStr for Weekday {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Weekday::Mon),
            "tue" | "tuesday" => Ok(Weekday::Tue),
            "wed" | "wednesday" => Ok(Weekday::Wed),
            "thu" | "thursday" => Ok(Weekday::Thu),
            "fri" | "friday" => Ok(Weekday::Fri),
            "sat" | "saturday" => Ok(Weekday::Sat),
            "sun" | "sunday" => Ok(Weekday::Sun),
            _ => Err(ParseError::UnknownWeekday(token.to_string())),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named calendar month for yearly recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Month number, January = 1.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }
}

impl FromStr for Month {
    type Err = ParseError;

    /// Accepts full names, three-letter abbreviations and numbers 1..=12.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Ok(n) = token.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Month::ALL.get(i).copied())
                .ok_or_else(|| ParseError::UnknownMonth(token.to_string()));
        }
        let lower = token.to_ascii_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| {
                let name = m.as_str().to_ascii_lowercase();
                lower == name || lower == name[..3]
            })
            .ok_or_else(|| ParseError::UnknownMonth(token.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of month in `1..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    pub fn new(day: u32) -> Result<Self, ParseError> {
        if (1..=31).contains(&day) {
            Ok(DayOfMonth(day as u8))
        } else {
            Err(ParseError::DayOutOfRange(day))
        }
    }

    pub fn get(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for DayOfMonth {
    type Error = ParseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        DayOfMonth::new(value)
    }
}

impl From<DayOfMonth> for u32 {
    fn from(value: DayOfMonth) -> Self {
        value.get()
    }
}

impl FromStr for DayOfMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = parse_number(s)?;
        DayOfMonth::new(n)
    }
}

/// Month interval in `1..=12` ("of every N month(s)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MonthInterval(u8);

impl MonthInterval {
    pub const ONE: MonthInterval = MonthInterval(1);

    pub fn new(months: u32) -> Result<Self, ParseError> {
        if (1..=12).contains(&months) {
            Ok(MonthInterval(months as u8))
        } else {
            Err(ParseError::IntervalOutOfRange(months))
        }
    }

    pub fn get(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for MonthInterval {
    type Error = ParseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        MonthInterval::new(value)
    }
}

impl From<MonthInterval> for u32 {
    fn from(value: MonthInterval) -> Self {
        value.get()
    }
}

impl FromStr for MonthInterval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = parse_number(s)?;
        MonthInterval::new(n)
    }
}

fn parse_number(s: &str) -> Result<u32, ParseError> {
    let token = s.trim();
    token
        .parse::<u32>()
        .map_err(|_| ParseError::NotANumber(token.to_string()))
}

/// Frequency of a custom range together with the sub-fields that frequency uses.
///
/// Fields of other frequencies are not representable, so switching frequency
/// always starts from [`RowSchedule::for_frequency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSchedule {
    Daily,
    Weekly {
        days: BTreeSet<Weekday>,
    },
    Monthly {
        day: Option<DayOfMonth>,
        interval: Option<MonthInterval>,
    },
    Yearly {
        day: Option<DayOfMonth>,
        month: Option<Month>,
    },
    Fortnight,
    OneTime,
    /// A frequency token that is not one of [`Frequency::ALL`].
    Unrecognized(String),
}

impl RowSchedule {
    /// Fresh sub-fields for a row switching to `frequency`.
    pub fn for_frequency(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Daily => RowSchedule::Daily,
            Frequency::Weekly => RowSchedule::Weekly {
                days: BTreeSet::new(),
            },
            Frequency::Monthly => RowSchedule::Monthly {
                day: None,
                interval: Some(MonthInterval::ONE),
            },
            Frequency::Yearly => RowSchedule::Yearly {
                day: None,
                month: None,
            },
            Frequency::Fortnight => RowSchedule::Fortnight,
            Frequency::OneTime => RowSchedule::OneTime,
        }
    }

    /// Interprets a raw frequency token, keeping unknown tokens as [`RowSchedule::Unrecognized`].
    pub fn from_token(token: &str) -> Self {
        match token.parse::<Frequency>() {
            Ok(frequency) => RowSchedule::for_frequency(frequency),
            Err(_) => RowSchedule::Unrecognized(token.to_string()),
        }
    }

    /// The recognized frequency, or `None` for [`RowSchedule::Unrecognized`].
    pub fn frequency(&self) -> Option<Frequency> {
        match self {
            RowSchedule::Daily => Some(Frequency::Daily),
            RowSchedule::Weekly { .. } => Some(Frequency::Weekly),
            RowSchedule::Monthly { .. } => Some(Frequency::Monthly),
            RowSchedule::Yearly { .. } => Some(Frequency::Yearly),
            RowSchedule::Fortnight => Some(Frequency::Fortnight),
            RowSchedule::OneTime => Some(Frequency::OneTime),
            RowSchedule::Unrecognized(_) => None,
        }
    }
}

impl Default for RowSchedule {
    fn default() -> Self {
        RowSchedule::for_frequency(Frequency::Weekly)
    }
}
