//! Descriptive statistics for byte and group columns

use crate::analysis::groups::DerivedColumns;
use crate::io::error::{AnalysisError, Result};
use crate::math::moments::population_variance;
use crate::matrix::{ByteMatrix, ColumnRef, GroupId};
use ndarray::{Array1, Axis};
use num_traits::AsPrimitive;
use std::collections::BTreeMap;
use std::ops::Sub;

/// Population statistics of one column across all records
///
/// `min`, `max` and `mean` are rounded to `f64` for display. The spread and
/// the constant classification come from the exact integer values, so wide
/// group columns that differ only in their low bits are never reported as
/// constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStatistics {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divides by N)
    pub std_dev: f64,
    range: f64,
    constant: bool,
}

impl ColumnStatistics {
    /// Whether every record holds the same value
    ///
    /// Constant columns always carry a standard deviation of exactly zero.
    pub const fn is_constant(&self) -> bool {
        self.constant
    }

    /// Distance between the extremes, taken before rounding to `f64`
    pub const fn range(&self) -> f64 {
        self.range
    }
}

/// Compute min, max, mean and population standard deviation
///
/// Deviations are measured from the column minimum in the value's own type,
/// which keeps the spread of large group values that `f64` cannot tell apart.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyColumn`] if `values` yields nothing
pub fn compute_stats<T, I>(values: I) -> Result<ColumnStatistics>
where
    T: Copy + PartialOrd + Sub<Output = T> + AsPrimitive<f64>,
    I: IntoIterator<Item = T>,
{
    let values: Vec<T> = values.into_iter().collect();
    let first = values.first().copied().ok_or(AnalysisError::EmptyColumn)?;

    let (min, max) = values.iter().fold((first, first), |(min, max), &x| {
        (
            if x < min { x } else { min },
            if x > max { x } else { max },
        )
    });
    let constant = max <= min;

    let offsets: Array1<f64> = values.iter().map(|&x| (x - min).as_()).collect();
    let offset_mean = offsets.mean().ok_or(AnalysisError::EmptyColumn)?;

    let std_dev = if constant {
        0.0
    } else {
        population_variance(offsets.view())
            .ok_or(AnalysisError::EmptyColumn)?
            .sqrt()
    };

    Ok(ColumnStatistics {
        min: min.as_(),
        max: max.as_(),
        mean: min.as_() + offset_mean,
        std_dev,
        range: (max - min).as_(),
        constant,
    })
}

/// Statistics for every byte column and every active group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsTable {
    bytes: Vec<ColumnStatistics>,
    groups: BTreeMap<GroupId, ColumnStatistics>,
}

impl StatisticsTable {
    /// Compute statistics for all columns of a matrix and its groups
    ///
    /// # Errors
    ///
    /// Returns an error if a column has no values, which a validated matrix
    /// never produces
    pub fn compute(matrix: &ByteMatrix, derived: &DerivedColumns) -> Result<Self> {
        let bytes = matrix
            .as_array()
            .axis_iter(Axis(1))
            .map(|column| compute_stats(column.iter().copied()))
            .collect::<Result<Vec<_>>>()?;

        let groups = derived
            .iter()
            .map(|(id, values)| {
                let stats = compute_stats(values.iter().copied())?;
                Ok::<_, AnalysisError>((id, stats))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self { bytes, groups })
    }

    /// Statistics of any column, if it exists
    pub fn get(&self, column: ColumnRef) -> Option<&ColumnStatistics> {
        match column {
            ColumnRef::Byte(index) => self.bytes.get(index),
            ColumnRef::Group(id) => self.groups.get(&id),
        }
    }

    /// Statistics of every byte column in column order
    pub fn bytes(&self) -> &[ColumnStatistics] {
        &self.bytes
    }

    /// Statistics of every active group keyed by id
    pub const fn groups(&self) -> &BTreeMap<GroupId, ColumnStatistics> {
        &self.groups
    }

    /// Every column whose values never change
    pub fn constant_columns(&self) -> Vec<ColumnRef> {
        self.iter()
            .filter(|(_, stats)| stats.is_constant())
            .map(|(column, _)| column)
            .collect()
    }

    /// Iterate all columns, bytes first, then groups by id
    pub fn iter(&self) -> impl Iterator<Item = (ColumnRef, &ColumnStatistics)> + '_ {
        self.bytes
            .iter()
            .enumerate()
            .map(|(index, stats)| (ColumnRef::Byte(index), stats))
            .chain(
                self.groups
                    .iter()
                    .map(|(&id, stats)| (ColumnRef::Group(id), stats)),
            )
    }
}
