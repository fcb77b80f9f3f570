//! Multi-byte group composition
//!
//! A group names an ordered list of byte columns and derives one wide
//! integer per record by composing the referenced bytes big-endian: the
//! first listed index is the most significant byte. Indices may repeat.

use crate::io::configuration::{GROUP_NAME_SEPARATOR, MAX_GROUP_WIDTH};
use crate::io::error::{AnalysisError, Result};
use crate::matrix::{ByteMatrix, ColumnValue, GroupId};
use ndarray::{ArrayView1, Axis};
use std::collections::BTreeMap;

/// User-defined combination of byte columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteGroup {
    id: GroupId,
    indices: Vec<usize>,
    name: String,
}

impl ByteGroup {
    /// Identifier assigned at creation
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Ordered byte indices, most significant first
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bytes composed per record
    pub const fn width(&self) -> usize {
        self.indices.len()
    }

    /// Largest value the group can take, `2^(8*width) - 1`
    pub fn max_value(&self) -> ColumnValue {
        match self.width() {
            0 => 0,
            w if w >= MAX_GROUP_WIDTH => ColumnValue::MAX,
            w => (1 << (8 * w)) - 1,
        }
    }
}

/// Default display name, e.g. `b0+b1` for indices `[0, 1]`
pub fn default_group_name(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|index| format!("b{index}"))
        .collect::<Vec<_>>()
        .join(GROUP_NAME_SEPARATOR)
}

/// Check that a group's index list is usable against a matrix width
///
/// # Errors
///
/// Returns an error if:
/// - The list is empty
/// - The list is longer than [`MAX_GROUP_WIDTH`]
/// - Any index is outside `0..width`
pub fn validate_indices(indices: &[usize], width: usize) -> Result<()> {
    if indices.is_empty() {
        return Err(AnalysisError::InvalidColumnReference {
            column: None,
            width,
        });
    }
    if indices.len() > MAX_GROUP_WIDTH {
        return Err(AnalysisError::GroupTooWide {
            width: indices.len(),
            max: MAX_GROUP_WIDTH,
        });
    }
    indices
        .iter()
        .find(|&&index| index >= width)
        .map_or(Ok(()), |&index| {
            Err(AnalysisError::InvalidColumnReference {
                column: Some(index),
                width,
            })
        })
}

/// Compose the referenced bytes of one record big-endian
///
/// Returns `None` if an index falls outside the record.
pub fn compose_value(values: ArrayView1<'_, u8>, indices: &[usize]) -> Option<ColumnValue> {
    indices.iter().try_fold(0, |acc: ColumnValue, &index| {
        values
            .get(index)
            .map(|&byte| (acc << 8) | ColumnValue::from(byte))
    })
}

/// Derive the group's value for every record of a matrix
///
/// # Errors
///
/// Returns an error if the group's indices are not valid for the matrix
pub fn apply(group: &ByteGroup, matrix: &ByteMatrix) -> Result<Vec<ColumnValue>> {
    let width = matrix.width();
    validate_indices(&group.indices, width)?;

    matrix
        .as_array()
        .axis_iter(Axis(0))
        .map(|record| {
            compose_value(record, &group.indices).ok_or_else(|| {
                AnalysisError::InvalidColumnReference {
                    column: group.indices.iter().copied().max(),
                    width,
                }
            })
        })
        .collect()
}

/// Creates groups with monotonically increasing ids
///
/// Ids start at 1 and are never handed out twice, even after the group that
/// held one has been removed.
#[derive(Debug, Clone)]
pub struct GroupComposer {
    next_id: u64,
}

impl Default for GroupComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupComposer {
    /// Create a composer whose first group gets id 1
    pub const fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Id the next created group will receive
    pub const fn peek_next_id(&self) -> GroupId {
        GroupId(self.next_id)
    }

    /// Create a group with the default name
    ///
    /// # Errors
    ///
    /// Returns an error if the indices are empty, too many, or out of range
    pub fn create_group(&mut self, matrix: &ByteMatrix, indices: &[usize]) -> Result<ByteGroup> {
        self.create_named_group(matrix, indices, default_group_name(indices))
    }

    /// Create a group with a caller-supplied name
    ///
    /// No id is consumed when validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the indices are empty, too many, or out of range
    pub fn create_named_group(
        &mut self,
        matrix: &ByteMatrix,
        indices: &[usize],
        name: impl Into<String>,
    ) -> Result<ByteGroup> {
        validate_indices(indices, matrix.width())?;

        let id = GroupId(self.next_id);
        self.next_id += 1;

        let group = ByteGroup {
            id,
            indices: indices.to_vec(),
            name: name.into(),
        };
        tracing::debug!(id = id.0, name = group.name(), "created byte group");
        Ok(group)
    }
}

/// Per-record values of every active group, keyed by group id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedColumns {
    columns: BTreeMap<GroupId, Vec<ColumnValue>>,
}

impl DerivedColumns {
    /// Apply every group to a matrix
    ///
    /// # Errors
    ///
    /// Returns an error if any group references a column the matrix lacks;
    /// the whole recompute fails in that case
    pub fn compute(groups: &[ByteGroup], matrix: &ByteMatrix) -> Result<Self> {
        let columns = groups
            .iter()
            .map(|group| Ok::<_, AnalysisError>((group.id, apply(group, matrix)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { columns })
    }

    /// Values of one group column
    pub fn get(&self, id: GroupId) -> Option<&[ColumnValue]> {
        self.columns.get(&id).map(Vec::as_slice)
    }

    /// Value of one group for one record
    pub fn value(&self, id: GroupId, record: usize) -> Option<ColumnValue> {
        self.columns
            .get(&id)
            .and_then(|values| values.get(record))
            .copied()
    }

    /// Number of group columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no group columns are present
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate group columns in id order
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[ColumnValue])> + '_ {
        self.columns
            .iter()
            .map(|(&id, values)| (id, values.as_slice()))
    }
}
