//! Error types and context management for capture analysis

use std::fmt;
use std::path::{Path, PathBuf};

/// Why a line of hex input was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Line length differs from the first line
    LengthMismatch {
        /// Character length of the first line
        expected: usize,
        /// Character length of the offending line
        found: usize,
    },
    /// A character outside `[0-9A-Fa-f]`
    NonHexCharacter {
        /// 1-based character position within the line
        position: usize,
        /// The rejected character
        character: char,
    },
    /// Lines must hold whole bytes (two digits each)
    OddLength {
        /// Character length of the line
        length: usize,
    },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, found } => {
                write!(f, "expected {expected} characters, found {found}")
            }
            Self::NonHexCharacter {
                position,
                character,
            } => {
                write!(f, "non-hex character {character:?} at position {position}")
            }
            Self::OddLength { length } => {
                write!(f, "odd number of hex digits ({length})")
            }
        }
    }
}

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Input contained no lines after trimming
    EmptyInput,

    /// Input failed hex or shape validation
    ///
    /// No partial matrix is produced when this occurs.
    MalformedInput {
        /// 1-based line number of the first offending line
        line: usize,
        /// What was wrong with the line
        reason: MalformedReason,
    },

    /// A group or selection referenced a column outside the matrix
    InvalidColumnReference {
        /// Offending byte index, `None` when the reference list was empty
        column: Option<usize>,
        /// Column count of the matrix the reference was checked against
        width: usize,
    },

    /// Group composes more bytes than a column value can hold
    GroupTooWide {
        /// Number of byte indices requested
        width: usize,
        /// Maximum supported group width
        max: usize,
    },

    /// Group id does not name an active group
    UnknownGroup {
        /// The requested id
        id: u64,
    },

    /// Statistics requested over a column without values
    EmptyColumn,

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Numerical or shape computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Failed to save a rendered heatmap to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Input contains no records"),
            Self::MalformedInput { line, reason } => {
                write!(f, "Malformed input on line {line}: {reason}")
            }
            Self::InvalidColumnReference {
                column: Some(column),
                width,
            } => {
                write!(
                    f,
                    "Column {column} is out of range for records of {width} bytes"
                )
            }
            Self::InvalidColumnReference {
                column: None,
                width,
            } => {
                write!(
                    f,
                    "Column reference list is empty (records have {width} bytes)"
                )
            }
            Self::GroupTooWide { width, max } => {
                write!(f, "Group of {width} bytes exceeds the maximum of {max}")
            }
            Self::UnknownGroup { id } => write!(f, "No active group with id {id}"),
            Self::EmptyColumn => write!(f, "Column has no values"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Attaches the path being worked on to I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into [`AnalysisError::FileSystem`] naming `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| AnalysisError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> AnalysisError {
    AnalysisError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an out-of-range column error
pub const fn column_out_of_range(column: usize, width: usize) -> AnalysisError {
    AnalysisError::InvalidColumnReference {
        column: Some(column),
        width,
    }
}
