//! Mathematical utilities for the analysis engine

/// Mean, variance and Pearson correlation kernels
pub mod moments;
/// Frequency counting and Shannon entropy
pub mod probability;
