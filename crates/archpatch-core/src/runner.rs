//! Runs the patches against a project tree.
//!
//! The [`Runner`] owns the filesystem side: it resolves each patch's path under
//! the project root, skips files that already carry the patch's marker, and
//! goes through [`crate::backup::write_with_backup`] for every write. Files are
//! handled one at a time, start to finish, and nothing is rolled back if a
//! later step fails.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::write_with_backup;
use crate::detect::is_already_patched;
use crate::patches::{FilePatch, genrule, standard_patches};
use crate::types::{PatchError, RunReport, StepReport, StepStatus};

/// File whose presence identifies the project root.
pub const PROJECT_ROOT_MARKER: &str = "build-system/BUILD";

/// Applies the fixed file patches and the genrule pass under one root.
///
/// # Example
///
/// ```no_run
/// use archpatch_core::Runner;
///
/// let report = Runner::new("/path/to/ios-project")
///     .dry_run(true)
///     .run()?;
/// assert!(report.dry_run);
/// # Ok::<(), archpatch_core::PatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    project_root: PathBuf,
    dry_run: bool,
    verbose: bool,
    skip_genrules: bool,
    genrule_files: Vec<String>,
}

impl Runner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            dry_run: false,
            verbose: false,
            skip_genrules: false,
            genrule_files: genrule::DEFAULT_GENRULE_FILES
                .iter()
                .map(|path| path.to_string())
                .collect(),
        }
    }

    /// Reports what would change without creating backups or writing files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Prints the marker and anchor details for each file.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn skip_genrules(mut self, skip: bool) -> Self {
        self.skip_genrules = skip;
        self
    }

    /// Replaces the genrule file list (paths relative to the project root).
    pub fn genrule_files(mut self, files: Vec<String>) -> Self {
        self.genrule_files = files;
        self
    }

    /// Fails unless [`PROJECT_ROOT_MARKER`] exists under the project root.
    pub fn check_project_root(&self) -> Result<(), PatchError> {
        if self.project_root.join(PROJECT_ROOT_MARKER).exists() {
            Ok(())
        } else {
            Err(PatchError::NotProjectRoot(self.project_root.clone()))
        }
    }

    /// Runs every fixed patch, then the genrule pass unless skipped.
    ///
    /// A missing file fails its step but the remaining steps still run. I/O
    /// errors abort the run.
    pub fn run(&self) -> Result<RunReport, PatchError> {
        let patches = standard_patches();
        let total = patches.len() + 1;

        let mut report = RunReport {
            dry_run: self.dry_run,
            success: true,
            ..RunReport::default()
        };

        for (index, patch) in patches.iter().enumerate() {
            let step = self.run_file_patch(index + 1, total, patch.as_ref())?;
            report.success &= step.status.is_success();
            report.steps.push(step);
        }

        if !self.skip_genrules {
            report.genrules = Some(self.run_genrules(total, total)?);
        }

        Ok(report)
    }

    /// Runs one fixed patch as step `step` of `total`.
    pub fn run_file_patch(
        &self,
        step: usize,
        total: usize,
        patch: &dyn FilePatch,
    ) -> Result<StepReport, PatchError> {
        let relative = patch.path();
        println!("\n[{}/{}] Patching {}", step, total, relative);

        let path = self.project_root.join(relative);
        if !path.exists() {
            eprintln!("  ERROR: File not found: {}", relative);
            return Ok(StepReport::new(relative, StepStatus::Missing));
        }

        let content = read_file(&path)?;
        if self.verbose {
            println!("  Checking for marker '{}'", patch.marker());
            println!("  Anchor: {}", patch.anchor());
        }
        if is_already_patched(&content, patch.marker()) {
            println!("  Already patched, skipping.");
            return Ok(StepReport::new(relative, StepStatus::AlreadyPatched));
        }

        if self.dry_run {
            println!("  [DRY RUN] {}", patch.dry_run_summary());
            return Ok(StepReport::new(relative, StepStatus::WouldPatch));
        }

        let patched = patch.apply(&content);
        let backup = write_with_backup(&path, &patched)?;
        println!("  Backup created: {}", backup.display());

        let status = if patched == content {
            if self.verbose {
                println!("  No anchor matched; content written back unchanged");
            }
            StepStatus::Unchanged
        } else {
            StepStatus::Patched
        };
        println!("  {}", patch.success_message());

        Ok(StepReport::new(relative, status).with_backup(backup))
    }

    /// Runs the genrule pass over the configured files as step `step` of `total`.
    ///
    /// Missing files are warnings here, not failures.
    pub fn run_genrules(&self, step: usize, total: usize) -> Result<Vec<StepReport>, PatchError> {
        println!(
            "\n[{}/{}] Patching genrule BUILD files (ffmpeg, opus, libvpx, etc.)",
            step, total
        );

        let mut reports = Vec::with_capacity(self.genrule_files.len());
        for relative in &self.genrule_files {
            let path = self.project_root.join(relative);
            if !path.exists() {
                eprintln!("  WARNING: File not found: {}", relative);
                reports.push(StepReport::new(relative, StepStatus::Missing));
                continue;
            }

            let content = read_file(&path)?;
            if is_already_patched(&content, genrule::marker()) {
                println!("  {}: Already patched, skipping.", relative);
                reports.push(StepReport::new(relative, StepStatus::AlreadyPatched));
                continue;
            }

            if self.dry_run {
                println!("  [DRY RUN] Would patch {}", relative);
                reports.push(StepReport::new(relative, StepStatus::WouldPatch));
                continue;
            }

            let duplication = genrule::apply(&content);
            let blocks = duplication.blocks;
            let backup = write_with_backup(&path, &duplication.into_text())?;
            println!("  Backup created: {}", backup.display());

            let status = if blocks > 0 {
                if self.verbose {
                    println!("  {}: duplicated {} ios_sim_arm64 block(s)", relative, blocks);
                }
                println!("  {}: Successfully patched", relative);
                StepStatus::Patched
            } else {
                println!("  {}: No changes needed or pattern not found", relative);
                StepStatus::Unchanged
            };
            reports.push(StepReport::new(relative.as_str(), status).with_backup(backup));
        }

        Ok(reports)
    }
}

fn read_file(path: &Path) -> Result<String, PatchError> {
    fs::read_to_string(path).map_err(|e| PatchError::io(path, e))
}
