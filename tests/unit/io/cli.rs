//! Tests for command-line interface parsing and file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use hexlens::AnalysisError;
    use hexlens::io::cli::{Cli, FileProcessor, GroupSpec, heatmap_path, report_path};
    use hexlens::io::configuration::{DEFAULT_CORRELATION_THRESHOLD, DEFAULT_HEATMAP_CELL_SIZE};
    use std::ffi::OsString;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::Level;

    fn cli_for(target: &Path, flags: &[&str]) -> Cli {
        let mut args = vec![OsString::from("program"), target.as_os_str().to_owned()];
        args.extend(flags.iter().map(OsString::from));
        Cli::parse_from(args)
    }

    // Tests CLI parsing with only required target file argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "capture.hex"]);

        assert_eq!(cli.target, PathBuf::from("capture.hex"));
        assert_eq!(cli.bytes, None);
        assert!(cli.groups.is_empty());
        assert!((cli.threshold - DEFAULT_CORRELATION_THRESHOLD).abs() < f64::EPSILON);
        assert_eq!(cli.cell_size, DEFAULT_HEATMAP_CELL_SIZE);
        assert!(!cli.heatmap);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    // Tests CLI parsing with all available arguments
    // Verified by modifying custom parsers to ensure they're invoked
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "captures",
            "--bytes",
            "0,3,7",
            "--group",
            "0:1",
            "--group",
            "3:2:1",
            "--threshold",
            "0.5",
            "--heatmap",
            "--cell-size",
            "8",
            "--quiet",
            "--no-skip",
        ]);

        assert_eq!(cli.target, PathBuf::from("captures"));
        assert_eq!(cli.bytes, Some(vec![0, 3, 7]));
        assert_eq!(
            cli.groups,
            vec![GroupSpec(vec![0, 1]), GroupSpec(vec![3, 2, 1])]
        );
        assert!((cli.threshold - 0.5).abs() < f64::EPSILON);
        assert!(cli.heatmap);
        assert_eq!(cli.cell_size, 8);
        assert!(cli.quiet);
        assert!(cli.no_skip);
    }

    // Tests group specs parse and print in colon form
    // Verified by splitting on commas
    #[test]
    fn test_group_spec_parsing() {
        let spec: GroupSpec = "4:0: 2".parse().unwrap();
        assert_eq!(spec, GroupSpec(vec![4, 0, 2]));
        assert_eq!(spec.to_string(), "4:0:2");

        assert!("1:x".parse::<GroupSpec>().is_err());
        assert!("".parse::<GroupSpec>().is_err());
        assert!(Cli::try_parse_from(["program", "a.hex", "--group", "0:-1"]).is_err());
    }

    // Tests file skip behavior based on --no-skip flag
    // Verified by inverting boolean logic in skip_existing method
    #[test]
    fn test_skip_existing_logic() {
        assert!(Cli::parse_from(["program", "a.hex"]).skip_existing());
        assert!(!Cli::parse_from(["program", "a.hex", "--no-skip"]).skip_existing());
    }

    // Tests progress display and log level follow --quiet and -v
    // Verified by ignoring the quiet flag in the log level
    #[test]
    fn test_progress_and_log_level() {
        let cli_default = Cli::parse_from(["program", "a.hex"]);
        assert!(cli_default.should_show_progress());
        assert_eq!(cli_default.log_level(), Level::WARN);

        let cli_quiet = Cli::parse_from(["program", "a.hex", "--quiet", "-vv"]);
        assert!(!cli_quiet.should_show_progress());
        assert_eq!(cli_quiet.log_level(), Level::ERROR);

        assert_eq!(Cli::parse_from(["program", "a.hex", "-v"]).log_level(), Level::INFO);
        assert_eq!(Cli::parse_from(["program", "a.hex", "-vv"]).log_level(), Level::DEBUG);
        assert_eq!(Cli::parse_from(["program", "a.hex", "-vvvv"]).log_level(), Level::TRACE);
    }

    // Tests short flag parsing (-b, -g, -t, -c)
    // Verified by changing short flag definitions
    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "program", "a.hex", "-b", "1,2", "-g", "2:1", "-t", "0.9", "-c", "2", "-q", "-n",
        ]);

        assert_eq!(cli.bytes, Some(vec![1, 2]));
        assert_eq!(cli.groups, vec![GroupSpec(vec![2, 1])]);
        assert!((cli.threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(cli.cell_size, 2);
        assert!(cli.quiet);
        assert!(cli.no_skip);
    }

    // Tests output paths sit next to the capture with suffixes
    // Verified by keeping the capture extension on the report
    #[test]
    fn test_output_paths() {
        assert_eq!(
            report_path(Path::new("dir/run1.hex")),
            PathBuf::from("dir/run1_report.txt")
        );
        assert_eq!(
            heatmap_path(Path::new("run1.txt")),
            PathBuf::from("run1_heatmap.png")
        );
    }

    // Tests a single capture produces a report and heatmap
    // Verified by writing the report before selecting bytes
    #[test]
    fn test_process_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("capture.hex");
        fs::write(&input, "0102\n0304\n0506\n").unwrap();

        let cli = cli_for(&input, &["--quiet", "--heatmap", "--group", "0:1"]);
        let reports = FileProcessor::new(cli).process().unwrap();

        let report = dir.path().join("capture_report.txt");
        assert_eq!(reports, vec![report.clone()]);
        let text = fs::read_to_string(&report).unwrap();
        assert!(text.contains("Selected: [0, 1]"));
        assert!(text.contains("group:1 (b0+b1)"));
        assert!(text.contains("byte:0 ~ byte:1  +1.0000"));
        assert!(dir.path().join("capture_heatmap.png").exists());
    }

    // Tests directories are scanned for captures and reports are skipped
    // Verified by processing every file regardless of extension
    #[test]
    fn test_process_directory_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.hex"), "00ff\n0f0f\n").unwrap();
        fs::write(dir.path().join("b.txt"), "10\n20\n30\n").unwrap();
        fs::write(dir.path().join("notes.md"), "not a capture").unwrap();
        fs::write(dir.path().join("b_report.txt"), "old report").unwrap();

        let cli = cli_for(dir.path(), &["--quiet"]);
        let reports = FileProcessor::new(cli).process().unwrap();

        assert_eq!(reports, vec![dir.path().join("a_report.txt")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("b_report.txt")).unwrap(),
            "old report"
        );

        let cli = cli_for(dir.path(), &["-q", "-n"]);
        let reports = FileProcessor::new(cli).process().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(
            fs::read_to_string(dir.path().join("b_report.txt"))
                .unwrap()
                .starts_with("Capture:")
        );
    }

    // Tests malformed captures and bad targets surface as errors
    // Verified by swallowing decode errors per file
    #[test]
    fn test_process_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.hex");
        fs::write(&input, "0102\n03").unwrap();

        let cli = cli_for(&input, &["-q"]);
        assert!(matches!(
            FileProcessor::new(cli).process(),
            Err(AnalysisError::MalformedInput { line: 2, .. })
        ));

        let other = dir.path().join("image.png");
        fs::write(&other, "x").unwrap();
        let cli = cli_for(&other, &["-q"]);
        assert!(matches!(
            FileProcessor::new(cli).process(),
            Err(AnalysisError::InvalidParameter {
                parameter: "target",
                ..
            })
        ));

        let missing = dir.path().join("missing");
        let cli = cli_for(&missing, &["-q"]);
        assert!(FileProcessor::new(cli).process().is_err());
    }

    // Tests a failing capture still closes the progress display
    // Verified by returning before the progress bars are cleaned up
    #[test]
    fn test_process_error_clears_progress() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.hex"), "0102\n0304\n").unwrap();
        fs::write(dir.path().join("b.hex"), "0102\nzz").unwrap();

        let mut processor = FileProcessor::new(cli_for(dir.path(), &[]));
        assert!(processor.process().is_err());

        let progress = processor.progress().unwrap();
        assert_eq!(progress.file_count(), 2);
        assert!(progress.is_finished());
        assert!(FileProcessor::new(cli_for(dir.path(), &["-q"])).progress().is_none());
    }

    // Tests invalid thresholds are rejected before any file is touched
    // Verified by validating the threshold per file
    #[test]
    fn test_process_invalid_threshold() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.hex"), "0102").unwrap();

        let cli = cli_for(dir.path(), &["-q", "--threshold", "2"]);
        assert!(FileProcessor::new(cli).process().is_err());
        assert!(!dir.path().join("a_report.txt").exists());
    }
}
