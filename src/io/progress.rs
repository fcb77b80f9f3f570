//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Processing steps a capture file passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Loading the file from disk
    Reading,
    /// Turning hex text into a byte matrix
    Decoding,
    /// Computing statistics, entropy and correlations
    Analyzing,
    /// Writing the report and heatmap
    Exporting,
    /// All outputs written
    Done,
}

impl Stage {
    /// Every stage in processing order
    pub const ALL: [Self; 5] = [
        Self::Reading,
        Self::Decoding,
        Self::Analyzing,
        Self::Exporting,
        Self::Done,
    ];

    /// Position of the stage, used as the bar position
    pub const fn step(self) -> u64 {
        match self {
            Self::Reading => 0,
            Self::Decoding => 1,
            Self::Analyzing => 2,
            Self::Exporting => 3,
            Self::Done => 4,
        }
    }

    /// Number of steps until a file is done
    pub const fn total_steps() -> u64 {
        Self::Done.step()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Reading => "reading",
            Self::Decoding => "decoding",
            Self::Analyzing => "analyzing",
            Self::Exporting => "exporting",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Coordinates progress display for batch operations
///
/// Automatically switches between individual progress bars (for small batches)
/// and a single batch progress bar (for large batches) based on file count
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
    /// Stores (`filename`, `stage`) for rolling window display
    file_states: Vec<(String, Stage)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg:>9}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
            file_states: Vec::new(),
        }
    }

    /// Number of files the manager was initialized for
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Whether a batch bar is shown in addition to the file bars
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Number of per-file bars on screen
    pub fn visible_bars(&self) -> usize {
        self.file_bars.len()
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(Stage::total_steps());
            pb.set_style(PROGRESS_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure progress bar for a new file
    pub fn start_file(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states
                .resize(index + 1, (String::new(), Stage::Reading));
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = (display_name, Stage::Reading);
        }
        self.update_bars();
    }

    /// Move a file to the given stage
    pub fn set_stage(&mut self, index: usize, stage: Stage) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.1 = stage;
        }
        self.update_bars();
    }

    /// Stage a file is currently in, if it was started
    pub fn stage(&self, index: usize) -> Option<Stage> {
        self.file_states
            .get(index)
            .filter(|(name, _)| !name.is_empty())
            .map(|&(_, stage)| stage)
    }

    /// Mark file as completed and update batch progress
    pub fn complete_file(&mut self, index: usize, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.file_states.get_mut(index) {
            tracing::debug!(file = %state.0, ?elapsed, "file complete");
            state.0 = format!("✓ {}", state.0);
            state.1 = Stage::Done;
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        self.clear_file_bars();
    }

    /// Clean up after a batch stopped on an error
    pub fn abandon(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.abandon_with_message("Stopped on error");
        }
        self.clear_file_bars();
    }

    /// Whether every bar has been finished or abandoned
    pub fn is_finished(&self) -> bool {
        self.file_bars
            .iter()
            .chain(self.batch_bar.iter())
            .all(ProgressBar::is_finished)
    }

    fn clear_file_bars(&self) {
        for bar in &self.file_bars {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }

    /// Update all progress bars to show the last N active files
    fn update_bars(&self) {
        let active_files: Vec<_> = self
            .file_states
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let start_idx = active_files
            .len()
            .saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible_files = active_files.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (name, stage)) in visible_files.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(Stage::total_steps());
                bar.set_position(stage.step());
                bar.set_message(stage.to_string());
                bar.set_prefix(name.clone());
            }
        }

        for bar_idx in visible_files.len()..self.file_bars.len() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}
