//! Front end around the analysis engine
//!
//! Holds the crate error type and constants, plus the batch command-line
//! tool with its text reports, PNG heatmaps and progress display.

/// Command-line arguments and batch file processing
pub mod cli;
/// Analysis constants and runtime configuration
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG heatmap rendering of chart tables
pub mod heatmap;
/// Multi-file progress bars
pub mod progress;
/// Plain-text snapshot reports
pub mod report;
