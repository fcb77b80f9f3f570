//! Entropy, statistics and correlation analysis of fixed-width hex captures
//!
//! Each line of a capture is one record of equal-length bytes. The engine
//! decodes the text into a byte matrix, composes user-defined multi-byte
//! groups into derived columns, and recomputes per-column statistics,
//! entropy and pairwise correlation whenever the selection changes.

#![forbid(unsafe_code)]

/// Group composition, statistics and information measures
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Entropy and moment helpers shared by the analysis modules
pub mod math;
/// Hex decoding, byte matrices and column addressing
pub mod matrix;
/// Analysis session state and published snapshots
pub mod session;

pub use io::error::{AnalysisError, Result};
