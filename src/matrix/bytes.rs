//! Rectangular byte matrix with one row per decoded record
//!
//! The matrix is immutable after construction. Sessions replace it wholesale
//! on every successful decode and share it behind an `Arc`.

use crate::io::error::{AnalysisError, Result, column_out_of_range, computation_error};
use ndarray::{Array2, ArrayView1, Axis};

/// One decoded row of the matrix
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// 0-based position of the record, equal to its input line
    pub index: usize,
    /// Byte values of the record, `W` entries
    pub values: ArrayView1<'a, u8>,
}

/// Validated matrix of records sharing one column count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteMatrix {
    data: Array2<u8>,
}

impl ByteMatrix {
    /// Wrap an array of shape (records, columns)
    ///
    /// # Errors
    ///
    /// Returns an error if the array has no records or no columns
    pub fn from_array(data: Array2<u8>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(AnalysisError::EmptyInput);
        }
        if cols == 0 {
            return Err(AnalysisError::InvalidColumnReference {
                column: None,
                width: 0,
            });
        }
        Ok(Self { data })
    }

    /// Build a matrix from a flat row-major buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer does not match the shape or the shape
    /// is empty
    pub fn from_flat(records: usize, width: usize, values: Vec<u8>) -> Result<Self> {
        let data = Array2::from_shape_vec((records, width), values)
            .map_err(|e| computation_error("matrix shape", &e))?;
        Self::from_array(data)
    }

    /// Number of records (rows)
    pub fn record_count(&self) -> usize {
        self.data.nrows()
    }

    /// Number of byte columns per record (`W`)
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// Record at a 0-based position
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        (index < self.record_count()).then(|| Record {
            index,
            values: self.data.row(index),
        })
    }

    /// Iterate records in input order
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.data
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(index, values)| Record { index, values })
    }

    /// Values of one byte column across all records
    ///
    /// # Errors
    ///
    /// Returns an error if the column is outside `0..W`
    pub fn column(&self, index: usize) -> Result<ArrayView1<'_, u8>> {
        if index < self.width() {
            Ok(self.data.column(index))
        } else {
            Err(column_out_of_range(index, self.width()))
        }
    }

    /// Single byte value, if both positions are in range
    pub fn value(&self, record: usize, column: usize) -> Option<u8> {
        self.data.get([record, column]).copied()
    }

    /// Check that every index is a valid column
    ///
    /// # Errors
    ///
    /// Returns an error naming the first index outside `0..W`
    pub fn validate_columns(&self, indices: &[usize]) -> Result<()> {
        let width = self.width();
        indices
            .iter()
            .find(|&&index| index >= width)
            .map_or(Ok(()), |&index| Err(column_out_of_range(index, width)))
    }

    /// Underlying (records, columns) array
    pub const fn as_array(&self) -> &Array2<u8> {
        &self.data
    }
}
