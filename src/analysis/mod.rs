//! Analysis modules for derived columns, statistics and information measures

/// Multi-byte group composition and derived columns
pub mod groups;
/// Entropy, joint entropy and pairwise correlation
pub mod information;
/// Per-column descriptive statistics
pub mod statistics;
