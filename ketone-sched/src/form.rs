//! Raw form state as it is written to and read from draft files.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::draft::ScheduleDraft;
use crate::edit::{apply_field_update, optional, parse_weekdays, FieldUpdate};
use crate::entry::{next_unused_id, DateRangeEntry, IdGenerator, RowId};
use crate::error::{EditError, FormError};
use crate::selection::{JobFrequencySelection, JobMode};

/// A form value that may be written as text or as a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(i64),
    Text(String),
}

impl FormValue {
    fn into_text(self) -> String {
        match self {
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s,
        }
    }
}

fn text(value: Option<FormValue>) -> String {
    value.map(FormValue::into_text).unwrap_or_default()
}

/// One custom range row as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeForm {
    pub id: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(alias = "freq")]
    pub frequency: Option<String>,
    #[serde(alias = "monthlyDay")]
    pub monthly_day: Option<FormValue>,
    #[serde(alias = "monthlyInterval", alias = "monthlyIntervalMonths")]
    pub monthly_interval: Option<FormValue>,
    #[serde(alias = "weeklyDays")]
    pub weekly_days: Vec<String>,
    #[serde(alias = "yearlyDay")]
    pub yearly_day: Option<FormValue>,
    #[serde(alias = "yearlyMonth")]
    pub yearly_month: Option<FormValue>,
}

/// A whole schedule form: the job mode, its fixed-mode fields and the custom ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftForm {
    #[serde(alias = "jobFrequency")]
    pub mode: Option<String>,
    #[serde(alias = "monthlyDay")]
    pub monthly_day: Option<FormValue>,
    #[serde(alias = "monthlyInterval", alias = "monthlyIntervalMonths")]
    pub monthly_interval: Option<FormValue>,
    #[serde(alias = "weeklyDays")]
    pub weekly_days: Vec<String>,
    #[serde(alias = "yearlyDay")]
    pub yearly_day: Option<FormValue>,
    #[serde(alias = "yearlyMonth")]
    pub yearly_month: Option<FormValue>,
    #[serde(alias = "customRanges")]
    pub ranges: Vec<RangeForm>,
}

impl DraftForm {
    /// Replays the form into a draft, applying fields in the order a user edits them.
    ///
    /// Rows without an explicit id get one from `ids` that no other row in the
    /// form claims.
    pub fn into_draft<G: IdGenerator>(self, mut ids: G) -> Result<ScheduleDraft<G>, FormError> {
        let mode = match self.mode.as_deref() {
            Some(mode) if !mode.trim().is_empty() => mode.parse::<JobMode>()?,
            _ => JobMode::default(),
        };

        let defaults = JobFrequencySelection::default();
        let selection = JobFrequencySelection {
            mode,
            monthly_day: optional("monthly_day", &text(self.monthly_day)),
            monthly_interval: match self.monthly_interval {
                Some(value) => optional("monthly_interval", &value.into_text()),
                None => defaults.monthly_interval,
            },
            weekly_days: parse_weekdays(&self.weekly_days.join(",")),
            yearly_day: optional("yearly_day", &text(self.yearly_day)),
            yearly_month: optional("yearly_month", &text(self.yearly_month)),
        };

        let mut explicit = HashSet::new();
        for id in self.ranges.iter().filter_map(|range| range.id.as_deref()) {
            let id = RowId::new(id);
            if !explicit.insert(id.clone()) {
                return Err(FormError::DuplicateRowId(id));
            }
        }

        let mut generated = HashSet::new();
        let mut rows = Vec::with_capacity(self.ranges.len());
        for (index, range) in self.ranges.into_iter().enumerate() {
            let id = match &range.id {
                Some(id) => RowId::new(id.as_str()),
                None => {
                    let id = next_unused_id(&mut ids, |id| {
                        explicit.contains(id) || generated.contains(id)
                    });
                    generated.insert(id.clone());
                    id
                }
            };
            let row = range
                .into_entry(id)
                .map_err(|source| FormError::Range { index, source })?;
            rows.push(row);
        }

        Ok(ScheduleDraft::from_parts(selection, rows, ids))
    }
}

impl RangeForm {
    fn into_entry(self, id: RowId) -> Result<DateRangeEntry, EditError> {
        let mut fields: Vec<(&str, String)> = Vec::new();
        if let Some(frequency) = self.frequency {
            fields.push(("frequency", frequency));
        }
        fields.push(("start", self.start));
        fields.push(("end", self.end));
        if let Some(day) = self.monthly_day {
            fields.push(("monthly_day", day.into_text()));
        }
        if let Some(interval) = self.monthly_interval {
            fields.push(("monthly_interval", interval.into_text()));
        }
        if !self.weekly_days.is_empty() {
            fields.push(("weekly_days", self.weekly_days.join(",")));
        }
        if let Some(day) = self.yearly_day {
            fields.push(("yearly_day", day.into_text()));
        }
        if let Some(month) = self.yearly_month {
            fields.push(("yearly_month", month.into_text()));
        }

        let mut row = DateRangeEntry::with_id(id);
        for (field, raw) in fields {
            row = apply_field_update(&row, FieldUpdate::parse(field, &raw)?);
        }
        Ok(row)
    }
}
