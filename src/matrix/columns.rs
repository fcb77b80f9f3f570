//! Column keys, group ids and selection bitsets

use crate::io::error::{Result, column_out_of_range};
use bitvec::prelude::*;
use std::fmt;

/// Integer type of every column value
///
/// Byte columns are widened into it and groups compose into it, which caps
/// a group at 16 bytes.
pub type ColumnValue = u128;

/// Identifier of a byte group, assigned once and never reused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a column: a raw byte position or a derived group
///
/// Orders byte columns before group columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnRef {
    /// Raw byte column `0 <= i < W`
    Byte(usize),
    /// Derived group column
    Group(GroupId),
}

impl ColumnRef {
    /// Byte index for raw columns
    pub const fn byte_index(self) -> Option<usize> {
        match self {
            Self::Byte(index) => Some(index),
            Self::Group(_) => None,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(index) => write!(f, "byte:{index}"),
            Self::Group(id) => write!(f, "group:{id}"),
        }
    }
}

/// Fixed-size bitset of byte column indices
///
/// Indices are 0-based column positions. Membership is bounded by the
/// matrix width the set was created for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSet {
    bits: BitVec,
    width: usize,
}

impl ColumnSet {
    /// Create a set with no columns present
    pub fn new(width: usize) -> Self {
        Self {
            bits: bitvec![0; width],
            width,
        }
    }

    /// Create a set containing every column
    pub fn all(width: usize) -> Self {
        Self {
            bits: bitvec![1; width],
            width,
        }
    }

    /// Build a set from column indices
    ///
    /// # Errors
    ///
    /// Returns an error if any index is outside `0..width`
    pub fn from_indices(indices: &[usize], width: usize) -> Result<Self> {
        let mut set = Self::new(width);
        for &index in indices {
            set.insert(index)?;
        }
        Ok(set)
    }

    /// Number of columns the set spans
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Insert a column, returning whether it was newly added
    ///
    /// # Errors
    ///
    /// Returns an error if the index is outside `0..width`
    pub fn insert(&mut self, index: usize) -> Result<bool> {
        let was_present = self.flip_to(index, true)?;
        Ok(!was_present)
    }

    /// Remove a column, returning whether it was present
    ///
    /// # Errors
    ///
    /// Returns an error if the index is outside `0..width`
    pub fn remove(&mut self, index: usize) -> Result<bool> {
        self.flip_to(index, false)
    }

    /// Toggle a column, returning its new membership
    ///
    /// # Errors
    ///
    /// Returns an error if the index is outside `0..width`
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let now_present = !self.contains(index);
        self.flip_to(index, now_present)?;
        Ok(now_present)
    }

    fn flip_to(&mut self, index: usize, value: bool) -> Result<bool> {
        let width = self.width;
        let mut bit = self
            .bits
            .get_mut(index)
            .ok_or_else(|| column_out_of_range(index, width))?;
        let previous = *bit;
        *bit = value;
        Ok(previous)
    }

    /// Test column membership
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Test if no columns are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count columns in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate present columns in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all column indices in ascending order
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Resize to a new width, dropping members that no longer fit
    ///
    /// Returns the indices that were dropped.
    pub fn resize(&mut self, width: usize) -> Vec<usize> {
        let dropped = self.iter().filter(|&index| index >= width).collect();
        self.bits.resize(width, false);
        self.width = width;
        dropped
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ColumnSet({} of {}: {:?})",
            self.count(),
            self.width,
            self.to_vec()
        )
    }
}
