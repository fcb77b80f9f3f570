//! Entropy and correlation measures over decoded columns
//!
//! Entropy works on the empirical distribution of values in a column, and
//! joint entropy on the distribution of per-record tuples across several
//! columns. Correlation is Pearson's coefficient between raw byte columns;
//! only pairs above the configured threshold are reported.

use crate::io::configuration::{DEFAULT_CORRELATION_THRESHOLD, validate_threshold};
use crate::io::error::{AnalysisError, Result, computation_error};
use crate::math::moments::pearson;
use crate::math::probability::{frequency_counts, shannon_entropy};
use crate::matrix::{ByteMatrix, ColumnRef, ColumnSet, ColumnValue};
use ndarray::{Array1, ArrayView2, Axis};
use num_traits::AsPrimitive;
use std::collections::BTreeMap;
use std::hash::Hash;

/// Shannon entropy in bits of a column's value distribution
///
/// A single repeated value gives 0; `N` pairwise-distinct values give
/// `log2(N)`.
pub fn entropy<T, I>(values: I) -> f64
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    shannon_entropy(frequency_counts(values).into_values())
}

/// Joint entropy of the record tuples formed by the columns of `table`
///
/// Each row is one composite symbol. Returns `None` for fewer than two
/// columns.
pub fn joint_entropy(table: ArrayView2<'_, ColumnValue>) -> Option<f64> {
    (table.ncols() >= 2).then(|| {
        let tuples = table.axis_iter(Axis(0)).map(|row| row.to_vec());
        entropy(tuples)
    })
}

/// Pearson correlation of two columns
///
/// Returns `0.0` when either column is constant.
///
/// # Errors
///
/// Returns a computation error if the columns differ in length
pub fn correlate<A, B, IA, IB>(a: IA, b: IB) -> Result<f64>
where
    A: AsPrimitive<f64>,
    B: AsPrimitive<f64>,
    IA: IntoIterator<Item = A>,
    IB: IntoIterator<Item = B>,
{
    let a: Array1<f64> = a.into_iter().map(AsPrimitive::<f64>::as_).collect();
    let b: Array1<f64> = b.into_iter().map(AsPrimitive::<f64>::as_).collect();
    pearson(a.view(), b.view()).ok_or_else(|| {
        computation_error(
            "correlation",
            &format!("column lengths differ: {} and {}", a.len(), b.len()),
        )
    })
}

/// Entropy of each analysed column plus their joint entropy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntropyResult {
    /// Bits per column
    pub per_column: BTreeMap<ColumnRef, f64>,
    /// Bits over the tuple of all columns, present for two or more columns
    pub joint_entropy: Option<f64>,
}

impl EntropyResult {
    /// Entropy of one column, if it was analysed
    pub fn get(&self, column: ColumnRef) -> Option<f64> {
        self.per_column.get(&column).copied()
    }
}

/// Correlation between two raw byte columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationEdge {
    /// Lower-indexed column of the pair
    pub column_a: ColumnRef,
    /// Higher-indexed column of the pair
    pub column_b: ColumnRef,
    /// Pearson coefficient in `[-1, 1]`
    pub coefficient: f64,
}

impl CorrelationEdge {
    /// Whether `|coefficient|` strictly exceeds the threshold
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.coefficient.abs() > threshold
    }
}

/// Entropy of every column of a chart table and of their tuples
///
/// `columns` names the columns of `table` in order.
pub fn entropy_report(
    columns: &[ColumnRef],
    table: ArrayView2<'_, ColumnValue>,
) -> EntropyResult {
    let per_column = columns
        .iter()
        .zip(table.axis_iter(Axis(1)))
        .map(|(&column, values)| (column, entropy(values.iter().copied())))
        .collect();

    EntropyResult {
        per_column,
        joint_entropy: joint_entropy(table),
    }
}

/// Correlation of every unordered pair of selected byte columns
///
/// Pairs are ordered by their first, then second, column index.
///
/// # Errors
///
/// Returns an error if a selected index is outside the matrix
pub fn correlation_pairs(
    matrix: &ByteMatrix,
    selected: &ColumnSet,
) -> Result<Vec<CorrelationEdge>> {
    let columns = selected
        .iter()
        .map(|index| {
            let values: Array1<f64> = matrix.column(index)?.mapv(f64::from);
            Ok::<_, AnalysisError>((index, values))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut edges = Vec::with_capacity(columns.len() * columns.len().saturating_sub(1) / 2);
    for (position, (index_a, values_a)) in columns.iter().enumerate() {
        for (index_b, values_b) in columns.iter().skip(position + 1) {
            let coefficient = pearson(values_a.view(), values_b.view()).ok_or_else(|| {
                computation_error("correlation", &"byte columns differ in length")
            })?;
            edges.push(CorrelationEdge {
                column_a: ColumnRef::Byte(*index_a),
                column_b: ColumnRef::Byte(*index_b),
                coefficient,
            });
        }
    }
    Ok(edges)
}

/// Correlation analysis over a significance threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InformationAnalyzer {
    threshold: f64,
}

impl Default for InformationAnalyzer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CORRELATION_THRESHOLD,
        }
    }
}

impl InformationAnalyzer {
    /// Create an analyzer reporting pairs above `threshold`
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is outside `[0, 1]`
    pub fn new(threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    /// Configured significance threshold
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Keep only the edges above the threshold
    pub fn significant(&self, edges: &[CorrelationEdge]) -> Vec<CorrelationEdge> {
        edges
            .iter()
            .filter(|edge| edge.is_significant(self.threshold))
            .copied()
            .collect()
    }

    /// Significant correlations among the selected byte columns
    ///
    /// An empty result is the valid "no significant correlation" state.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected index is outside the matrix
    pub fn correlations(
        &self,
        matrix: &ByteMatrix,
        selected: &ColumnSet,
    ) -> Result<Vec<CorrelationEdge>> {
        Ok(self.significant(&correlation_pairs(matrix, selected)?))
    }
}
