//! Tests for byte matrix construction and record access

#[cfg(test)]
mod tests {
    use hexlens::AnalysisError;
    use hexlens::matrix::ByteMatrix;
    use ndarray::{Array2, array};

    // Tests construction from a flat row-major buffer
    // Verified by building the array in column-major order
    #[test]
    fn test_from_flat_row_major() {
        let matrix = ByteMatrix::from_flat(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();

        assert_eq!(matrix.record_count(), 2);
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.value(0, 2), Some(3));
        assert_eq!(matrix.value(1, 0), Some(4));
    }

    // Tests a buffer that does not fill the shape is rejected
    // Verified by truncating the buffer silently
    #[test]
    fn test_from_flat_shape_mismatch() {
        let result = ByteMatrix::from_flat(2, 3, vec![1, 2, 3, 4]);
        assert!(matches!(result, Err(AnalysisError::Computation { .. })));
    }

    // Tests empty shapes are rejected with specific errors
    // Verified by allowing zero-record matrices
    #[test]
    fn test_from_array_empty_shapes() {
        let no_records = ByteMatrix::from_array(Array2::zeros((0, 4)));
        assert!(matches!(no_records, Err(AnalysisError::EmptyInput)));

        let no_columns = ByteMatrix::from_array(Array2::zeros((3, 0)));
        assert!(matches!(
            no_columns,
            Err(AnalysisError::InvalidColumnReference { width: 0, .. })
        ));
    }

    // Tests records iterate in input order with their indices
    // Verified by iterating over columns instead of rows
    #[test]
    fn test_records_in_order() {
        let matrix = ByteMatrix::from_array(array![[1, 2], [3, 4], [5, 6]]).unwrap();

        let collected: Vec<(usize, Vec<u8>)> = matrix
            .records()
            .map(|record| (record.index, record.values.to_vec()))
            .collect();
        assert_eq!(
            collected,
            vec![(0, vec![1, 2]), (1, vec![3, 4]), (2, vec![5, 6])]
        );

        let record = matrix.record(1).unwrap();
        assert_eq!(record.index, 1);
        assert_eq!(record.values.to_vec(), vec![3, 4]);
        assert!(matrix.record(3).is_none());
    }

    // Tests column access and its range check
    // Verified by returning the last column for out-of-range indices
    #[test]
    fn test_column_access() {
        let matrix = ByteMatrix::from_array(array![[10, 20], [30, 40]]).unwrap();

        assert_eq!(matrix.column(1).unwrap().to_vec(), vec![20, 40]);
        assert!(matches!(
            matrix.column(2),
            Err(AnalysisError::InvalidColumnReference {
                column: Some(2),
                width: 2
            })
        ));
        assert_eq!(matrix.value(5, 0), None);
    }

    // Tests validation reports the first bad index
    // Verified by reporting the last bad index
    #[test]
    fn test_validate_columns() {
        let matrix = ByteMatrix::from_array(array![[0, 0, 0]]).unwrap();

        assert!(matrix.validate_columns(&[0, 2, 1]).is_ok());
        assert!(matrix.validate_columns(&[]).is_ok());
        assert!(matches!(
            matrix.validate_columns(&[1, 4, 7]),
            Err(AnalysisError::InvalidColumnReference {
                column: Some(4),
                width: 3
            })
        ));
    }
}
