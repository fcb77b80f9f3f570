//! Command-line interface for batch analysis of hex capture files

use crate::io::configuration::{
    AnalysisConfig, CAPTURE_EXTENSIONS, DEFAULT_CORRELATION_THRESHOLD, DEFAULT_HEATMAP_CELL_SIZE,
    HEATMAP_SUFFIX, REPORT_SUFFIX,
};
use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::io::heatmap::export_heatmap;
use crate::io::progress::{ProgressManager, Stage};
use crate::io::report::Report;
use crate::session::AnalysisSession;
use clap::{ArgAction, Parser};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::Level;

/// Byte indices of one `--group` argument, most significant first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec(pub Vec<usize>);

impl FromStr for GroupSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let indices = s
            .split(':')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|e| format!("invalid byte index '{part}': {e}"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self(indices))
    }
}

impl fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(":"))
    }
}

#[derive(Parser)]
#[command(name = "hexlens")]
#[command(
    version,
    about = "Entropy, statistics and correlation analysis of fixed-width hex captures"
)]
/// Command-line arguments for the capture analysis tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Hex capture file or directory of captures to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Byte columns to select, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub bytes: Option<Vec<usize>>,

    /// Byte group as colon separated indices, most significant first (repeatable)
    #[arg(short, long = "group", value_name = "INDICES")]
    pub groups: Vec<GroupSpec>,

    /// Minimum absolute correlation coefficient to report
    #[arg(short, long, default_value_t = DEFAULT_CORRELATION_THRESHOLD)]
    pub threshold: f64,

    /// Also write a PNG heatmap of the analysed columns
    #[arg(long)]
    pub heatmap: bool,

    /// Heatmap cell edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_HEATMAP_CELL_SIZE)]
    pub cell_size: u32,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level chosen by `--quiet` and the `-v` count
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Orchestrates batch processing of capture files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// Returns the paths of the reports written.
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails. The
    /// batch stops at the first failing capture and its progress bars are
    /// cleared.
    pub fn process(&mut self) -> Result<Vec<PathBuf>> {
        let config = AnalysisConfig::new(self.cli.threshold)?;
        let files = self.collect_files()?;

        if files.is_empty() {
            tracing::info!(path = %self.cli.target.display(), "nothing to process");
            return Ok(Vec::new());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let outcome = files
            .iter()
            .enumerate()
            .map(|(index, file)| self.process_file(file, index, config))
            .collect::<Result<Vec<_>>>();

        if let Some(ref pm) = self.progress_manager {
            if outcome.is_ok() {
                pm.finish();
            } else {
                pm.abandon();
            }
        }

        outcome
    }

    /// Progress display, absent when running quietly
    pub const fn progress(&self) -> Option<&ProgressManager> {
        self.progress_manager.as_ref()
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if is_capture(target) {
                if self.should_process_file(target) {
                    Ok(vec![target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"capture files must end in .hex or .txt",
                ))
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).with_path(target, "read directory")? {
                let path = entry.with_path(target, "read directory entry")?.path();
                if path.is_file() && is_capture(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a capture file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = report_path(input_path);
        if output_path.exists() {
            tracing::warn!(file = %input_path.display(), "skipping, report exists");
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        input_path: &Path,
        index: usize,
        config: AnalysisConfig,
    ) -> Result<PathBuf> {
        let start_time = Instant::now();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }
        let text = std::fs::read_to_string(input_path).with_path(input_path, "read capture")?;

        self.set_stage(index, Stage::Decoding);
        let mut session = AnalysisSession::new(config)?;
        session.decode(&text)?;

        self.set_stage(index, Stage::Analyzing);
        match self.cli.bytes {
            Some(ref bytes) => session.select_bytes(bytes)?,
            None => {
                let all: Vec<usize> = (0..session.width()).collect();
                session.select_bytes(&all)?;
            }
        }
        for spec in &self.cli.groups {
            for &byte in &spec.0 {
                session.append_draft_byte(byte)?;
            }
            session.commit_group()?;
        }

        let Some(snapshot) = session.snapshot() else {
            return Err(invalid_parameter(
                "capture",
                &input_path.display(),
                &"decoded without a snapshot",
            ));
        };

        self.set_stage(index, Stage::Exporting);
        let title = input_path.display().to_string();
        let output_path = report_path(input_path);
        std::fs::write(&output_path, Report::new(&title, &snapshot).to_string())
            .with_path(&output_path, "write report")?;
        tracing::info!(path = %output_path.display(), "wrote report");

        if self.cli.heatmap {
            export_heatmap(&snapshot, self.cli.cell_size, &heatmap_path(input_path))?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(output_path)
    }

    fn set_stage(&mut self, index: usize, stage: Stage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.set_stage(index, stage);
        }
    }
}

// Reports share the .txt extension and are never treated as captures
fn is_capture(path: &Path) -> bool {
    let is_report = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(REPORT_SUFFIX));
    !is_report
        && path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| CAPTURE_EXTENSIONS.contains(&ext))
}

fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

/// Path of the text report written next to a capture
pub fn report_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, REPORT_SUFFIX, "txt")
}

/// Path of the heatmap written next to a capture
pub fn heatmap_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, HEATMAP_SUFFIX, "png")
}
