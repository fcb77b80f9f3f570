//! Decoded record matrices and column addressing
//!
//! This module contains the data side of the engine:
//! - Hex decoding and validation
//! - The immutable byte matrix and its records
//! - Column references and selection bitsets

/// Byte matrix and record views
pub mod bytes;
/// Column keys, group ids and column bitsets
pub mod columns;
/// Hex text decoding
pub mod decoder;

pub use bytes::{ByteMatrix, Record};
pub use columns::{ColumnRef, ColumnSet, ColumnValue, GroupId};
pub use decoder::decode;
