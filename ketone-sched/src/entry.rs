use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{DateInput, DateSpan};
use crate::frequency::{Frequency, RowSchedule};

/// Stable identifier of a custom range, assigned when the row is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        RowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId::new(value)
    }
}

/// Source of identifiers for newly created rows.
pub trait IdGenerator {
    fn next_id(&mut self) -> RowId;
}

/// Deterministic `row-1`, `row-2`, ... identifiers.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::with_prefix("row")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> RowId {
        let id = RowId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Random v4 UUID identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> RowId {
        RowId(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Draws ids from `ids` until one is not `taken`.
pub fn next_unused_id(ids: &mut impl IdGenerator, taken: impl Fn(&RowId) -> bool) -> RowId {
    loop {
        let id = ids.next_id();
        if !taken(&id) {
            return id;
        }
        debug!(%id, "skipping id already in use");
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> RowId {
        (**self).next_id()
    }
}

/// One user-defined custom recurrence range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeEntry {
    pub id: RowId,
    pub start: DateInput,
    /// Mirrors `start` while the row is one-time.
    pub end: DateInput,
    pub schedule: RowSchedule,
}

impl DateRangeEntry {
    /// Creates the default row: blank dates, weekly with no days picked.
    pub fn new(ids: &mut impl IdGenerator) -> Self {
        let id = ids.next_id();
        debug!(%id, "created custom range");
        Self::with_id(id)
    }

    pub fn with_id(id: RowId) -> Self {
        DateRangeEntry {
            id,
            start: DateInput::blank(),
            end: DateInput::blank(),
            schedule: RowSchedule::default(),
        }
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.schedule.frequency()
    }

    pub fn is_one_time(&self) -> bool {
        matches!(self.schedule, RowSchedule::OneTime)
    }

    /// The end used for comparisons: the start date for one-time rows.
    pub fn effective_end(&self) -> &DateInput {
        if self.is_one_time() {
            &self.start
        } else {
            &self.end
        }
    }

    /// The parsed `[start, effective end]` span, if both endpoints are valid dates.
    pub fn effective_range(&self) -> Option<DateSpan> {
        let start = self.start.parse()?;
        let end = self.effective_end().parse()?;
        Some(DateSpan { start, end })
    }
}
