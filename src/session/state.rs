//! Analysis session state machine
//!
//! The session owns the current matrix, the ad-hoc byte selection, the
//! grouping draft and the committed groups. Every mutating command finishes
//! by deriving a fresh [`Snapshot`]; failed commands leave the session and
//! its published snapshot untouched.

use crate::analysis::groups::{ByteGroup, GroupComposer, default_group_name, validate_indices};
use crate::analysis::information::InformationAnalyzer;
use crate::io::configuration::AnalysisConfig;
use crate::io::error::{AnalysisError, Result, column_out_of_range};
use crate::matrix::{ByteMatrix, ColumnSet, GroupId, decode};
use crate::session::snapshot::Snapshot;
use std::sync::Arc;

/// Coarse lifecycle state derived from the session contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No matrix has been decoded
    Empty,
    /// A matrix is present but nothing is selected or grouped
    Decoded,
    /// At least one byte is selected or one group is defined
    Analyzing,
}

/// Long-lived, externally driven analysis session
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    analyzer: InformationAnalyzer,
    composer: GroupComposer,
    groups: Vec<ByteGroup>,
    selected: ColumnSet,
    draft: Vec<usize>,
    grouping_mode: bool,
    snapshot: Option<Arc<Snapshot>>,
    version: u64,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self {
            analyzer: InformationAnalyzer::default(),
            composer: GroupComposer::new(),
            groups: Vec::new(),
            selected: ColumnSet::new(0),
            draft: Vec::new(),
            grouping_mode: false,
            snapshot: None,
            version: 0,
        }
    }
}

impl AnalysisSession {
    /// Create an empty session
    ///
    /// # Errors
    ///
    /// Returns an error if the configured correlation threshold is invalid
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        Ok(Self {
            analyzer: InformationAnalyzer::new(config.correlation_threshold)?,
            ..Self::default()
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        if self.snapshot.is_none() {
            SessionState::Empty
        } else if self.selected.is_empty() && self.groups.is_empty() {
            SessionState::Decoded
        } else {
            SessionState::Analyzing
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    /// Current matrix, if one has been decoded
    pub fn matrix(&self) -> Option<&ByteMatrix> {
        self.snapshot.as_deref().map(Snapshot::matrix)
    }

    /// Column count of the current matrix, zero when empty
    pub fn width(&self) -> usize {
        self.matrix().map_or(0, ByteMatrix::width)
    }

    /// Selected byte columns
    pub const fn selected_bytes(&self) -> &ColumnSet {
        &self.selected
    }

    /// Byte indices collected for the group being assembled
    pub fn grouping_draft(&self) -> &[usize] {
        &self.draft
    }

    /// Whether toggles currently edit the grouping draft
    pub const fn is_grouping(&self) -> bool {
        self.grouping_mode
    }

    /// Committed groups in id order
    pub fn groups(&self) -> &[ByteGroup] {
        &self.groups
    }

    /// Current correlation threshold
    pub const fn correlation_threshold(&self) -> f64 {
        self.analyzer.threshold()
    }

    /// Decode new input and replace the matrix
    ///
    /// Existing groups are re-applied to the new matrix. Selected bytes and
    /// draft entries that no longer fit the new width are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not decode or an existing group
    /// references a column the new matrix lacks. The session is unchanged
    /// in both cases.
    pub fn decode(&mut self, text: &str) -> Result<Arc<Snapshot>> {
        let matrix = Arc::new(decode(text)?);
        let width = matrix.width();

        let mut selected = self.selected.clone();
        let dropped = selected.resize(width);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, width, "purged stale byte selections");
        }
        let draft: Vec<usize> = self
            .draft
            .iter()
            .copied()
            .filter(|&index| index < width)
            .collect();

        let snapshot = self.derive(Arc::clone(&matrix), &self.groups, &selected)?;

        tracing::info!(
            records = matrix.record_count(),
            width,
            groups = self.groups.len(),
            "decoded capture"
        );
        self.selected = selected;
        self.draft = draft;
        Ok(self.publish(snapshot))
    }

    /// Toggle a byte in the selection, or in the draft while grouping
    ///
    /// In grouping mode a byte already in the draft has its last occurrence
    /// removed; otherwise it is appended. Only selection changes publish a
    /// new snapshot. Returns whether the byte is now present in the edited
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns an error if no matrix is loaded or the index is out of range
    pub fn toggle_byte(&mut self, index: usize) -> Result<bool> {
        self.check_column(index)?;
        if self.grouping_mode {
            // Draft edits leave derived state untouched
            if let Some(position) = self.draft.iter().rposition(|&i| i == index) {
                self.draft.remove(position);
                return Ok(self.draft.contains(&index));
            }
            self.draft.push(index);
            return Ok(true);
        }
        let present = self.selected.toggle(index)?;
        self.recompute()?;
        Ok(present)
    }

    /// Add a byte to the selection
    ///
    /// # Errors
    ///
    /// Returns an error if no matrix is loaded or the index is out of range
    pub fn select_byte(&mut self, index: usize) -> Result<()> {
        self.check_column(index)?;
        self.selected.insert(index)?;
        self.recompute()
    }

    /// Remove a byte from the selection
    ///
    /// # Errors
    ///
    /// Returns an error if no matrix is loaded or the index is out of range
    pub fn deselect_byte(&mut self, index: usize) -> Result<()> {
        self.check_column(index)?;
        self.selected.remove(index)?;
        self.recompute()
    }

    /// Add several bytes to the selection with a single recompute
    ///
    /// # Errors
    ///
    /// Returns an error if no matrix is loaded or any index is out of range,
    /// in which case the selection is unchanged
    pub fn select_bytes(&mut self, indices: &[usize]) -> Result<()> {
        for &index in indices {
            self.check_column(index)?;
        }
        for &index in indices {
            self.selected.insert(index)?;
        }
        self.recompute()
    }

    /// Route subsequent toggles into the grouping draft
    pub const fn enter_grouping_mode(&mut self) {
        self.grouping_mode = true;
    }

    /// Leave grouping mode and discard the draft
    pub fn cancel_grouping(&mut self) {
        self.grouping_mode = false;
        self.draft.clear();
    }

    /// Append a byte to the draft, allowing repeats
    ///
    /// Enters grouping mode if it was not active.
    ///
    /// # Errors
    ///
    /// Returns an error if no matrix is loaded or the index is out of range
    pub fn append_draft_byte(&mut self, index: usize) -> Result<()> {
        self.check_column(index)?;
        self.grouping_mode = true;
        self.draft.push(index);
        Ok(())
    }

    /// Commit the draft as a group with its default name
    ///
    /// An empty draft is a no-op returning `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is not a valid group for the matrix
    pub fn commit_group(&mut self) -> Result<Option<GroupId>> {
        let name = default_group_name(&self.draft);
        self.commit_named_group(name)
    }

    /// Commit the draft as a group with a custom name
    ///
    /// An empty draft is a no-op returning `None`. On success the draft is
    /// cleared and grouping mode ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is not a valid group for the matrix
    pub fn commit_named_group(&mut self, name: impl Into<String>) -> Result<Option<GroupId>> {
        if self.draft.is_empty() {
            return Ok(None);
        }
        let Some(snapshot) = self.snapshot.clone() else {
            return Ok(None);
        };

        validate_indices(&self.draft, snapshot.width())?;
        let mut groups = self.groups.clone();
        let mut composer = self.composer.clone();
        let group = composer.create_named_group(snapshot.matrix(), &self.draft, name)?;
        let id = group.id();
        groups.push(group);

        let next = self.derive(snapshot.shared_matrix(), &groups, &self.selected)?;

        tracing::info!(id = id.0, "committed byte group");
        self.groups = groups;
        self.composer = composer;
        self.draft.clear();
        self.grouping_mode = false;
        self.publish(next);
        Ok(Some(id))
    }

    /// Delete a group and its derived column
    ///
    /// # Errors
    ///
    /// Returns an error if no active group has the id
    pub fn remove_group(&mut self, id: GroupId) -> Result<()> {
        let position = self
            .groups
            .iter()
            .position(|group| group.id() == id)
            .ok_or(AnalysisError::UnknownGroup { id: id.0 })?;
        let removed = self.groups.remove(position);
        tracing::info!(id = id.0, name = removed.name(), "removed byte group");
        self.recompute()
    }

    /// Change the correlation significance threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is outside `[0, 1]`. The previous
    /// threshold and snapshot stay in place.
    pub fn set_correlation_threshold(&mut self, threshold: f64) -> Result<()> {
        let analyzer = InformationAnalyzer::new(threshold)?;
        let next = self
            .snapshot
            .as_deref()
            .map(|current| {
                Snapshot::build(
                    self.version + 1,
                    current.shared_matrix(),
                    &self.groups,
                    &self.selected,
                    &analyzer,
                )
            })
            .transpose()?;

        self.analyzer = analyzer;
        if let Some(next) = next {
            self.publish(next);
        }
        Ok(())
    }

    /// Re-derive and publish the snapshot from the current state
    ///
    /// Does nothing before the first successful decode.
    ///
    /// # Errors
    ///
    /// Returns an error if the current groups or selection do not fit the
    /// matrix, which the other commands never allow
    pub fn recompute(&mut self) -> Result<()> {
        if let Some(current) = self.snapshot.clone() {
            let next = self.derive(current.shared_matrix(), &self.groups, &self.selected)?;
            self.publish(next);
        }
        Ok(())
    }

    fn derive(
        &self,
        matrix: Arc<ByteMatrix>,
        groups: &[ByteGroup],
        selected: &ColumnSet,
    ) -> Result<Snapshot> {
        Snapshot::build(self.version + 1, matrix, groups, selected, &self.analyzer)
    }

    fn publish(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.version = snapshot.version();
        tracing::debug!(version = self.version, "published snapshot");
        let shared = Arc::new(snapshot);
        self.snapshot = Some(Arc::clone(&shared));
        shared
    }

    fn check_column(&self, index: usize) -> Result<()> {
        let width = self.width();
        if index < width {
            Ok(())
        } else {
            Err(column_out_of_range(index, width))
        }
    }
}
