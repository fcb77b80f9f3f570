//! Immutable derived state published after every session change

use crate::analysis::groups::{ByteGroup, DerivedColumns};
use crate::analysis::information::{
    CorrelationEdge, EntropyResult, InformationAnalyzer, correlation_pairs, entropy_report,
};
use crate::analysis::statistics::StatisticsTable;
use crate::io::error::{AnalysisError, Result, computation_error};
use crate::matrix::{ByteMatrix, ColumnRef, ColumnSet, ColumnValue};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use std::sync::Arc;

/// Time-series shaped table of the analysed columns
///
/// One row per record and one column per selected byte (ascending) followed
/// by one column per active group (by id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTable {
    columns: Vec<ColumnRef>,
    values: Array2<ColumnValue>,
}

impl ChartTable {
    /// Assemble the table from selected bytes and derived group columns
    ///
    /// # Errors
    ///
    /// Returns an error if a selected byte is outside the matrix or a group
    /// column has the wrong number of records
    pub fn build(
        matrix: &ByteMatrix,
        selected: &ColumnSet,
        derived: &DerivedColumns,
    ) -> Result<Self> {
        let records = matrix.record_count();
        let mut columns = Vec::with_capacity(selected.count() + derived.len());
        let mut values = Array2::<ColumnValue>::zeros((records, 0));

        for index in selected.iter() {
            let column = matrix.column(index)?.mapv(ColumnValue::from);
            values
                .push_column(column.view())
                .map_err(|e| computation_error("chart table", &e))?;
            columns.push(ColumnRef::Byte(index));
        }

        for (id, group_values) in derived.iter() {
            values
                .push_column(ArrayView1::from(group_values))
                .map_err(|e| computation_error("chart table", &e))?;
            columns.push(ColumnRef::Group(id));
        }

        Ok(Self { columns, values })
    }

    /// Column keys in table order
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// Values as (records, columns)
    pub fn values(&self) -> ArrayView2<'_, ColumnValue> {
        self.values.view()
    }

    /// Values of one column, if it is part of the table
    pub fn column(&self, column: ColumnRef) -> Option<ArrayView1<'_, ColumnValue>> {
        self.columns
            .iter()
            .position(|&c| c == column)
            .map(|position| self.values.column(position))
    }

    /// One row of the table
    pub fn row(&self, record: usize) -> Option<ArrayView1<'_, ColumnValue>> {
        (record < self.record_count()).then(|| self.values.row(record))
    }

    /// Iterate rows in record order
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, ColumnValue>> + '_ {
        self.values.axis_iter(Axis(0))
    }

    /// Number of rows
    pub fn record_count(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Everything derived from one matrix, selection and group set
///
/// Snapshots are never modified after construction; sessions publish a new
/// one after every command.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: u64,
    matrix: Arc<ByteMatrix>,
    groups: Vec<ByteGroup>,
    selected: ColumnSet,
    derived: DerivedColumns,
    statistics: StatisticsTable,
    chart: ChartTable,
    entropy: EntropyResult,
    correlations: Vec<CorrelationEdge>,
    pairs_examined: usize,
    threshold: f64,
}

impl Snapshot {
    /// Derive all analysis state from its inputs
    ///
    /// # Errors
    ///
    /// Returns an error if a group or selection references a column outside
    /// the matrix
    pub fn build(
        version: u64,
        matrix: Arc<ByteMatrix>,
        groups: &[ByteGroup],
        selected: &ColumnSet,
        analyzer: &InformationAnalyzer,
    ) -> Result<Self> {
        if selected.width() != matrix.width() {
            return Err(AnalysisError::InvalidColumnReference {
                column: selected.iter().find(|&index| index >= matrix.width()),
                width: matrix.width(),
            });
        }

        let derived = DerivedColumns::compute(groups, &matrix)?;
        let statistics = StatisticsTable::compute(&matrix, &derived)?;
        let chart = ChartTable::build(&matrix, selected, &derived)?;
        let entropy = entropy_report(chart.columns(), chart.values());

        let pairs = correlation_pairs(&matrix, selected)?;
        let correlations = analyzer.significant(&pairs);

        Ok(Self {
            version,
            matrix,
            groups: groups.to_vec(),
            selected: selected.clone(),
            derived,
            statistics,
            chart,
            entropy,
            correlations,
            pairs_examined: pairs.len(),
            threshold: analyzer.threshold(),
        })
    }

    /// Monotonic version of the session state this was derived from
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// The decoded matrix
    pub fn matrix(&self) -> &ByteMatrix {
        &self.matrix
    }

    /// Shared handle to the decoded matrix
    pub fn shared_matrix(&self) -> Arc<ByteMatrix> {
        Arc::clone(&self.matrix)
    }

    /// Number of byte columns per record
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    /// Active groups in id order
    pub fn groups(&self) -> &[ByteGroup] {
        &self.groups
    }

    /// Selected byte columns
    pub const fn selected(&self) -> &ColumnSet {
        &self.selected
    }

    /// Per-record group values
    pub const fn derived(&self) -> &DerivedColumns {
        &self.derived
    }

    /// Statistics of every byte and group column
    pub const fn statistics(&self) -> &StatisticsTable {
        &self.statistics
    }

    /// Table of selected bytes and groups for charting
    pub const fn chart(&self) -> &ChartTable {
        &self.chart
    }

    /// Entropy of the chart columns
    pub const fn entropy(&self) -> &EntropyResult {
        &self.entropy
    }

    /// Correlation edges above the threshold
    pub fn correlations(&self) -> &[CorrelationEdge] {
        &self.correlations
    }

    /// Number of byte pairs that were correlated
    pub const fn pairs_examined(&self) -> usize {
        self.pairs_examined
    }

    /// Threshold the edges were filtered with
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }
}
