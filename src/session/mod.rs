//! Session orchestration over the analysis engine

/// Immutable derived state and the chart table
pub mod snapshot;
/// Selection, grouping and recompute state machine
pub mod state;

pub use snapshot::{ChartTable, Snapshot};
pub use state::{AnalysisSession, SessionState};
