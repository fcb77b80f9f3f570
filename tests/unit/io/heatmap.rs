//! Tests for PNG heatmap rendering and export

#[cfg(test)]
mod tests {
    use hexlens::AnalysisError;
    use hexlens::io::configuration::{CONSTANT_COLUMN_ALPHA, MAX_HEATMAP_CELL_SIZE};
    use hexlens::io::heatmap::{export_heatmap, render_heatmap};
    use hexlens::session::AnalysisSession;
    use image::Rgba;

    fn session_with(text: &str, bytes: &[usize]) -> AnalysisSession {
        let mut session = AnalysisSession::default();
        session.decode(text).unwrap();
        session.select_bytes(bytes).unwrap();
        session
    }

    // Tests image dimensions follow columns, records and cell size
    // Verified by swapping width and height
    #[test]
    fn test_render_dimensions() {
        let session = session_with("0102\n0304\n0506\n", &[0, 1]);
        let snapshot = session.snapshot().unwrap();

        let image = render_heatmap(&snapshot, 2).unwrap();

        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 6);
    }

    // Tests each column is scaled by its own extremes
    // Verified by scaling against the global maximum
    #[test]
    fn test_render_column_scaling() {
        let session = session_with("0010\n0520\n0a30\n", &[0, 1]);
        let snapshot = session.snapshot().unwrap();

        let image = render_heatmap(&snapshot, 1).unwrap();

        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(0, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 1), Rgba([128, 128, 128, 255]));
        assert_eq!(*image.get_pixel(1, 2), Rgba([255, 255, 255, 255]));
    }

    // Tests constant columns are drawn faded
    // Verified by drawing constant columns as black
    #[test]
    fn test_render_constant_column() {
        let session = session_with("ff00\nff01", &[0, 1]);
        let snapshot = session.snapshot().unwrap();

        let image = render_heatmap(&snapshot, 1).unwrap();

        let pixel = image.get_pixel(0, 1);
        assert_eq!(pixel.0[3], CONSTANT_COLUMN_ALPHA);
    }

    // Tests wide group columns shade by their exact offsets
    // Verified by scaling rounded f64 values
    #[test]
    fn test_render_wide_group() {
        let mut session = AnalysisSession::default();
        session
            .decode("FFFFFFFFFFFFFFFE\nFFFFFFFFFFFFFFFF")
            .unwrap();
        for index in 0..8 {
            session.append_draft_byte(index).unwrap();
        }
        session.commit_group().unwrap();
        let snapshot = session.snapshot().unwrap();

        let image = render_heatmap(&snapshot, 1).unwrap();

        assert_eq!(image.width(), 1);
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(0, 1), Rgba([255, 255, 255, 255]));
    }

    // Tests cell size and empty chart validation
    // Verified by clamping the cell size instead of rejecting it
    #[test]
    fn test_render_invalid_inputs() {
        let session = session_with("0102\n0304", &[0]);
        let snapshot = session.snapshot().unwrap();

        assert!(matches!(
            render_heatmap(&snapshot, 0),
            Err(AnalysisError::InvalidParameter {
                parameter: "cell_size",
                ..
            })
        ));
        assert!(render_heatmap(&snapshot, MAX_HEATMAP_CELL_SIZE + 1).is_err());

        let mut empty = AnalysisSession::default();
        empty.decode("0102").unwrap();
        let snapshot = empty.snapshot().unwrap();
        assert!(matches!(
            render_heatmap(&snapshot, 1),
            Err(AnalysisError::InvalidParameter {
                parameter: "columns",
                ..
            })
        ));
    }

    // Tests export writes a readable PNG and creates missing directories
    // Verified by skipping directory creation
    #[test]
    fn test_export_heatmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("capture_heatmap.png");
        let session = session_with("0102\n0304\n0506\n", &[0, 1]);
        let snapshot = session.snapshot().unwrap();

        export_heatmap(&snapshot, 3, &path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 6);
        assert_eq!(loaded.height(), 9);
    }
}
