use tracing::{debug, instrument};

use crate::edit::{apply_field_update, FieldUpdate};
use crate::entry::{next_unused_id, DateRangeEntry, IdGenerator, RowId};
use crate::error::{EditError, SaveError};
use crate::frequency::Weekday;
use crate::payload::{build_payload, SavePayload};
use crate::selection::{JobFrequencySelection, JobMode};
use crate::validate::{validate_with, ValidationReport, ValidatorOptions};

/// In-memory state of one schedule form.
///
/// Holds the job's frequency selection and the custom range rows. There is
/// always at least one row; rows are only consulted in Custom mode.
#[derive(Debug, Clone)]
pub struct ScheduleDraft<G> {
    selection: JobFrequencySelection,
    rows: Vec<DateRangeEntry>,
    ids: G,
}

impl<G: IdGenerator> ScheduleDraft<G> {
    /// Creates a draft in the default mode with one blank row.
    pub fn new(mut ids: G) -> Self {
        let first = DateRangeEntry::new(&mut ids);
        ScheduleDraft {
            selection: JobFrequencySelection::default(),
            rows: vec![first],
            ids,
        }
    }

    /// Creates a draft from existing rows, adding a blank one if `rows` is empty.
    ///
    /// Row ids in `rows` must be unique; later generated ids avoid them.
    pub fn from_parts(selection: JobFrequencySelection, rows: Vec<DateRangeEntry>, mut ids: G) -> Self {
        let rows = if rows.is_empty() {
            vec![DateRangeEntry::new(&mut ids)]
        } else {
            rows
        };
        ScheduleDraft { selection, rows, ids }
    }

    pub fn selection(&self) -> &JobFrequencySelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut JobFrequencySelection {
        &mut self.selection
    }

    pub fn set_mode(&mut self, mode: JobMode) {
        debug!(%mode, "job mode changed");
        self.selection.mode = mode;
    }

    pub fn rows(&self) -> &[DateRangeEntry] {
        &self.rows
    }

    pub fn row(&self, id: &RowId) -> Option<&DateRangeEntry> {
        self.rows.iter().find(|row| &row.id == id)
    }

    /// Appends a blank row and returns its id.
    ///
    /// Generated ids that are already used by a row are skipped.
    pub fn add_row(&mut self) -> RowId {
        let rows = &self.rows;
        let id = next_unused_id(&mut self.ids, |id| rows.iter().any(|row| &row.id == id));
        debug!(%id, "created custom range");
        self.rows.push(DateRangeEntry::with_id(id.clone()));
        id
    }

    /// Removes a row. The last remaining row cannot be removed.
    pub fn remove_row(&mut self, id: &RowId) -> Result<DateRangeEntry, EditError> {
        let index = self.index_of(id)?;
        if self.rows.len() == 1 {
            return Err(EditError::LastRow);
        }
        debug!(%id, "removed custom range");
        Ok(self.rows.remove(index))
    }

    /// Replaces a row with the result of applying `update` to it.
    pub fn update_row(&mut self, id: &RowId, update: FieldUpdate) -> Result<&DateRangeEntry, EditError> {
        let index = self.index_of(id)?;
        debug!(%id, ?update, "updating custom range");
        self.rows[index] = apply_field_update(&self.rows[index], update);
        Ok(&self.rows[index])
    }

    /// Applies a raw form value to the named field of a row.
    pub fn update_field(&mut self, id: &RowId, field: &str, raw: &str) -> Result<&DateRangeEntry, EditError> {
        let update = FieldUpdate::parse(field, raw)?;
        self.update_row(id, update)
    }

    pub fn toggle_weekday(&mut self, id: &RowId, day: Weekday) -> Result<&DateRangeEntry, EditError> {
        self.update_row(id, FieldUpdate::ToggleWeekday(day))
    }

    /// Findings for the custom rows; empty outside Custom mode.
    pub fn validate(&self, options: &ValidatorOptions) -> ValidationReport {
        if !self.selection.is_custom() {
            return ValidationReport::default();
        }
        validate_with(&self.rows, options)
    }

    #[instrument(skip_all)]
    pub fn save(&self, options: &ValidatorOptions) -> Result<SavePayload, SaveError> {
        build_payload(&self.selection, &self.rows, options)
    }

    fn index_of(&self, id: &RowId) -> Result<usize, EditError> {
        self.rows
            .iter()
            .position(|row| &row.id == id)
            .ok_or_else(|| EditError::UnknownRow(id.clone()))
    }
}
