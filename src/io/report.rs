//! Plain-text rendering of a session snapshot

use crate::matrix::ColumnRef;
use crate::session::Snapshot;
use std::fmt;

/// Text report over one snapshot, rendered through [`fmt::Display`]
pub struct Report<'a> {
    title: &'a str,
    snapshot: &'a Snapshot,
}

impl<'a> Report<'a> {
    /// Create a report headed by `title`
    pub const fn new(title: &'a str, snapshot: &'a Snapshot) -> Self {
        Self { title, snapshot }
    }

    fn column_label(&self, column: ColumnRef) -> String {
        match column {
            ColumnRef::Byte(_) => column.to_string(),
            ColumnRef::Group(id) => self
                .snapshot
                .groups()
                .iter()
                .find(|group| group.id() == id)
                .map_or_else(|| column.to_string(), |group| {
                    format!("{column} ({})", group.name())
                }),
        }
    }

    fn write_statistics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        writeln!(f, "Column statistics")?;
        writeln!(
            f,
            "  {:<24} {:>12} {:>12} {:>12} {:>12} {:>9}",
            "column", "min", "max", "mean", "std_dev", "entropy"
        )?;

        for (column, stats) in snapshot.statistics().iter() {
            let entropy = snapshot
                .entropy()
                .get(column)
                .map_or_else(|| "-".to_string(), |bits| format!("{bits:.4}"));
            let marker = if stats.is_constant() { "  constant" } else { "" };
            writeln!(
                f,
                "  {:<24} {:>12} {:>12} {:>12.4} {:>12.4} {:>9}{marker}",
                self.column_label(column),
                stats.min,
                stats.max,
                stats.mean,
                stats.std_dev,
                entropy
            )?;
        }
        Ok(())
    }

    fn write_correlations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        writeln!(
            f,
            "Correlations (|r| > {:.2}, {} pairs examined)",
            snapshot.threshold(),
            snapshot.pairs_examined()
        )?;

        if snapshot.correlations().is_empty() {
            return writeln!(f, "  no significant correlation");
        }
        for edge in snapshot.correlations() {
            writeln!(
                f,
                "  {} ~ {}  {:+.4}",
                edge.column_a, edge.column_b, edge.coefficient
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        writeln!(f, "Capture: {}", self.title)?;
        writeln!(
            f,
            "Records: {}  Bytes per record: {}  Groups: {}  Selected: {:?}",
            snapshot.matrix().record_count(),
            snapshot.width(),
            snapshot.groups().len(),
            snapshot.selected().to_vec()
        )?;
        writeln!(f)?;

        self.write_statistics(f)?;
        writeln!(f)?;

        match snapshot.entropy().joint_entropy {
            Some(bits) => writeln!(
                f,
                "Joint entropy: {bits:.4} bits over {} columns",
                snapshot.chart().column_count()
            )?,
            None => writeln!(f, "Joint entropy: n/a (fewer than two analysed columns)")?,
        }
        writeln!(f)?;

        self.write_correlations(f)
    }
}
