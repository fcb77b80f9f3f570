//! Analysis constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};

// Correlation reporting
/// Pairs with an absolute coefficient above this are reported
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;

// Column values are u128, so a group composes at most 16 bytes
/// Maximum number of byte indices in a group
pub const MAX_GROUP_WIDTH: usize = 16;

/// Separator between byte labels in default group names
pub const GROUP_NAME_SEPARATOR: &str = "+";

// Heatmap rendering
/// Default edge length of one heatmap cell in pixels
pub const DEFAULT_HEATMAP_CELL_SIZE: u32 = 4;
/// Largest accepted heatmap cell size
pub const MAX_HEATMAP_CELL_SIZE: u32 = 64;
/// Alpha applied to constant columns in the heatmap
pub const CONSTANT_COLUMN_ALPHA: u8 = 96;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// File extensions treated as hex captures
pub const CAPTURE_EXTENSIONS: [&str; 2] = ["hex", "txt"];
/// Suffix added to report filenames
pub const REPORT_SUFFIX: &str = "_report";
/// Suffix added to heatmap filenames
pub const HEATMAP_SUFFIX: &str = "_heatmap";

/// Runtime parameters of the information analysis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Minimum absolute Pearson coefficient (exclusive) for a reported edge
    pub correlation_threshold: f64,
}

impl AnalysisConfig {
    /// Create a configuration with a validated correlation threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not a finite value in `[0, 1]`
    pub fn new(correlation_threshold: f64) -> Result<Self> {
        validate_threshold(correlation_threshold)?;
        Ok(Self {
            correlation_threshold,
        })
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
        }
    }
}

/// Check that a correlation threshold lies in `[0, 1]`
///
/// # Errors
///
/// Returns an error for NaN or values outside the unit interval
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(invalid_parameter(
            "correlation_threshold",
            &threshold,
            &"must lie in [0, 1]",
        ))
    }
}
