//! # archpatch
//!
//! Command-line tool that patches a Bazel-based iOS project so it also builds
//! for the x86_64 simulator on Intel Macs.
//!
//! ## Overview
//!
//! Run it once from the project root. It:
//!
//! 1. Adds `ios_sim_x86_64` and `ios_x86_64` config settings to `build-system/BUILD`
//! 2. Adds x86_64 branches to the `select()`s of webrtc, libyuv, openh264, libsrtp and crc32c
//! 3. Adds `debug_sim_x86_64` / `release_sim_x86_64` configurations to `build-system/Make/Make.py`
//! 4. Duplicates the `ios_sim_arm64` branch of shell genrules (ffmpeg, opus, libvpx, ...)
//!
//! Each file is backed up to `<file>.backup.<YYYYmmdd_HHMMSS>` before it is
//! rewritten. Files that already carry the patch are skipped, so a second run
//! changes nothing.
//!
//! ## Quick Start
//!
//! ```bash
//! cd /path/to/ios-project
//!
//! # Preview
//! archpatch --dry-run
//!
//! # Apply, leaving genrules alone
//! archpatch --skip-genrules
//! ```
//!
//! ## CLI Flags
//!
//! - **`--dry-run`** - Show what would be changed without making modifications
//! - **`--skip-genrules`** - Skip patching genrule BUILD files
//! - **`--verbose` / `-v`** - Print marker and anchor details per file
//! - **`--project-root`** - Project root (default: current directory)
//! - **`--config`** - Explicit `archpatch.toml`
//! - **`--genrule-file`** - Genrule file to patch (repeatable; replaces the built-in list)
//! - **`--report`** - Write a JSON report of the run
//!
//! ## Modules
//!
//! - [`config`] - Configuration file support for `archpatch.toml`

use anyhow::{Context, Result};
use archpatch_core::{PatchError, RunReport, Runner};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub mod config;

/// Add Intel x86_64 simulator support to a Bazel-based iOS project.
#[derive(Parser, Debug)]
#[command(name = "archpatch", author, version, about = "Add Intel x86_64 simulator support to a Bazel-based iOS project", long_about = None)]
struct Cli {
    /// Show what would be changed without making modifications
    #[arg(long)]
    dry_run: bool,

    /// Skip patching genrule BUILD files (ffmpeg, opus, etc.)
    #[arg(long)]
    skip_genrules: bool,

    /// Print marker and anchor details for each file
    #[arg(long, short = 'v')]
    verbose: bool,

    #[arg(long, default_value = ".", help = "Project root containing build-system/BUILD")]
    project_root: PathBuf,

    #[arg(long, help = "Optional path to archpatch.toml")]
    config: Option<PathBuf>,

    #[arg(
        long = "genrule-file",
        value_name = "PATH",
        help = "Genrule BUILD file to patch, relative to the project root (repeatable)"
    )]
    genrule_files: Vec<String>,

    #[arg(long, help = "Optional output path for a JSON report of the run")]
    report: Option<PathBuf>,
}

const RULE: &str = "============================================================";

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    run_cli(cli).map(ExitCode::from)
}

/// Runs the CLI and returns the process exit status.
///
/// Only a failed project-root check exits non-zero; failed steps are
/// reported in the summary.
fn run_cli(cli: Cli) -> Result<u8> {
    println!("{RULE}");
    println!("Intel x86_64 Simulator Support Patch");
    println!("{RULE}");

    if cli.dry_run {
        println!("\n*** DRY RUN MODE - No files will be modified ***\n");
    }

    let mut runner = Runner::new(&cli.project_root)
        .dry_run(cli.dry_run)
        .verbose(cli.verbose)
        .skip_genrules(cli.skip_genrules);

    match runner.check_project_root() {
        Ok(()) => {}
        Err(PatchError::NotProjectRoot(_)) => {
            eprintln!("ERROR: This tool must be run from the iOS project root directory.");
            eprintln!("       Could not find {}", archpatch_core::PROJECT_ROOT_MARKER);
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    }

    let resolver = config::ConfigResolver::new(&cli.project_root, cli.config.as_deref())?;
    if cli.verbose
        && let Some(path) = &resolver.config_path
    {
        println!("Using config file {:?}", path);
    }
    if let Some(files) = resolver.resolve_genrule_files(&cli.genrule_files) {
        runner = runner.genrule_files(files);
    }

    let report = runner.run().context("patch run aborted")?;

    if let Some(path) = &cli.report {
        write_report(path, &report)?;
    }

    print_summary(&report);
    Ok(0)
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating parent directory {:?}", parent))?;
    }
    let json = report.to_json().context("serializing run report")?;
    fs::write(path, json).with_context(|| format!("writing report {:?}", path))
}

fn print_summary(report: &RunReport) {
    println!("\n{RULE}");

    if report.dry_run {
        println!("DRY RUN COMPLETE - No files were modified");
        println!("\nRun without --dry-run to apply changes.");
    } else if report.success {
        println!("PATCHING COMPLETE!");
        println!("\nNext steps:");
        println!("1. Run the generateProject command with x86_64 support:");
        println!();
        println!("   python3 build-system/Make/Make.py \\");
        println!("       --cacheDir=\"$HOME/telegram-bazel-cache\" \\");
        println!("       generateProject \\");
        println!(
            "       --configurationPath=build-system/template_minimal_development_configuration.json \\"
        );
        println!("       --xcodeManagedCodesigning");
        println!();
        println!("2. Or build directly for x86_64 simulator:");
        println!();
        println!("   python3 build-system/Make/Make.py \\");
        println!("       --cacheDir=\"$HOME/telegram-bazel-cache\" \\");
        println!("       build \\");
        println!(
            "       --configurationPath=build-system/template_minimal_development_configuration.json \\"
        );
        println!("       --xcodeManagedCodesigning \\");
        println!("       --buildNumber=10000 \\");
        println!("       --configuration=debug_sim_x86_64");
        println!();
        println!("Note: Backup files were created with .backup.* extension");
    } else {
        println!("PATCHING COMPLETED WITH ERRORS");
        println!("Please check the output above for details.");
    }

    println!("{RULE}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use archpatch_core::StepStatus;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("archpatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_defaults() {
        let cli = parse(&[]);
        assert!(!cli.dry_run);
        assert!(!cli.skip_genrules);
        assert!(!cli.verbose);
        assert_eq!(cli.project_root, PathBuf::from("."));
        assert!(cli.genrule_files.is_empty());
    }

    #[test]
    fn parses_flags() {
        let cli = parse(&[
            "--dry-run",
            "--skip-genrules",
            "-v",
            "--genrule-file",
            "third-party/opus/BUILD",
            "--genrule-file",
            "third-party/td/BUILD",
        ]);
        assert!(cli.dry_run && cli.skip_genrules && cli.verbose);
        assert_eq!(
            cli.genrule_files,
            vec!["third-party/opus/BUILD", "third-party/td/BUILD"]
        );
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["archpatch", "--force"]).is_err());
    }

    #[test]
    fn wrong_root_exits_with_one() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap();
        let code = run_cli(parse(&["--project-root", root])).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn failed_steps_still_exit_zero_and_write_report() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("build-system")).unwrap();
        fs::write(root.join("build-system/BUILD"), "").unwrap();
        let report_path = root.join("out/report.json");

        let code = run_cli(parse(&[
            "--project-root",
            root.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(code, 0);
        let report: RunReport =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert!(!report.success);
        assert_eq!(report.steps[0].status, StepStatus::Patched);
        assert_eq!(report.steps[1].status, StepStatus::Missing);
    }

    #[test]
    fn config_file_sets_genrule_list() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("build-system")).unwrap();
        fs::write(root.join("build-system/BUILD"), "").unwrap();
        fs::write(
            root.join(config::CONFIG_FILE_NAME),
            "[genrules]\nfiles = [\"vendor/x264/BUILD\"]\n",
        )
        .unwrap();
        let report_path = root.join("report.json");

        run_cli(parse(&[
            "--dry-run",
            "--project-root",
            root.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
        ]))
        .unwrap();

        let report: RunReport =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        let genrules = report.genrules.unwrap();
        assert_eq!(genrules.len(), 1);
        assert_eq!(genrules[0].path, PathBuf::from("vendor/x264/BUILD"));
        assert_eq!(genrules[0].status, StepStatus::Missing);
    }
}
