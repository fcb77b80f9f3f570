//! PNG heatmap export of the chart table

use crate::io::configuration::{CONSTANT_COLUMN_ALPHA, MAX_HEATMAP_CELL_SIZE};
use crate::io::error::{AnalysisError, Result, WithPath, computation_error, invalid_parameter};
use crate::matrix::ColumnValue;
use crate::session::Snapshot;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

// Per-column scaling; offsets from the minimum are taken on the exact values
#[derive(Debug, Clone, Copy)]
struct ColumnScale {
    min: ColumnValue,
    range: f64,
    constant: bool,
}

impl ColumnScale {
    fn shade(self, value: ColumnValue) -> Rgba<u8> {
        if self.constant || self.range <= 0.0 {
            return Rgba([128, 128, 128, CONSTANT_COLUMN_ALPHA]);
        }
        let offset = value.saturating_sub(self.min) as f64;
        let level = ((offset / self.range).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([level, level, level, 255])
    }
}

/// Render the chart table with one `cell_size` block per (record, column)
///
/// Records run top to bottom and columns left to right. Each column is
/// scaled by its own min/max; constant columns are drawn faded.
///
/// # Errors
///
/// Returns an error if:
/// - The cell size is zero or above [`MAX_HEATMAP_CELL_SIZE`]
/// - The chart table has no columns
/// - The image dimensions overflow
pub fn render_heatmap(snapshot: &Snapshot, cell_size: u32) -> Result<RgbaImage> {
    if cell_size == 0 || cell_size > MAX_HEATMAP_CELL_SIZE {
        return Err(invalid_parameter(
            "cell_size",
            &cell_size,
            &format!("must lie in 1..={MAX_HEATMAP_CELL_SIZE}"),
        ));
    }

    let chart = snapshot.chart();
    if chart.is_empty() {
        return Err(invalid_parameter(
            "columns",
            &"none",
            &"select at least one byte or define a group",
        ));
    }

    let scales = chart
        .columns()
        .iter()
        .map(|&column| {
            let stats = snapshot.statistics().get(column);
            let min = chart
                .column(column)
                .and_then(|values| values.iter().copied().min());
            stats
                .zip(min)
                .map(|(stats, min)| ColumnScale {
                    min,
                    range: stats.range(),
                    constant: stats.is_constant(),
                })
                .ok_or_else(|| {
                    computation_error("heatmap scale", &format!("no statistics for {column}"))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let width = scaled_dimension(chart.column_count(), cell_size)?;
    let height = scaled_dimension(chart.record_count(), cell_size)?;
    let values = chart.values();

    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let column = (x / cell_size) as usize;
        let record = (y / cell_size) as usize;
        match (scales.get(column), values.get([record, column])) {
            (Some(scale), Some(&value)) => scale.shade(value),
            _ => Rgba([0, 0, 0, 0]),
        }
    }))
}

fn scaled_dimension(count: usize, cell_size: u32) -> Result<u32> {
    u32::try_from(count)
        .ok()
        .and_then(|count| count.checked_mul(cell_size))
        .ok_or_else(|| {
            computation_error(
                "heatmap dimensions",
                &format!("{count} cells of {cell_size}px exceed the image size limit"),
            )
        })
}

/// Render the heatmap and save it as a PNG
///
/// # Errors
///
/// Returns an error if rendering fails, the parent directory cannot be
/// created, or the image cannot be saved
pub fn export_heatmap(snapshot: &Snapshot, cell_size: u32, output_path: &Path) -> Result<()> {
    let image = render_heatmap(snapshot, cell_size)?;

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }

    image
        .save(output_path)
        .map_err(|source| AnalysisError::ImageExport {
            path: output_path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %output_path.display(), "wrote heatmap");
    Ok(())
}
