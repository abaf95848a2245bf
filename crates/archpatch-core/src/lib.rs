//! Text patches that add x86_64 simulator support to a Bazel-based iOS build.
//!
//! `archpatch-core` rewrites a fixed set of `BUILD` files and the project's
//! `Make.py` so that the tree also builds for Intel Macs (`ios_x86_64`). It
//! is a one-shot migration tool: every rewrite anchors on exact text, every
//! write is preceded by a timestamped backup, and re-running it skips any
//! file that already carries its marker literal.
//!
//! # Architecture
//!
//! - **Duplicate**: [`duplicate`] copies shell `elif` branches for a new architecture
//! - **Detect**: [`detect`] decides whether a file is already patched
//! - **Backup**: [`backup`] performs backup-then-overwrite writes
//! - **Patches**: [`patches`] holds one rewrite per target file
//! - **Runner**: [`Runner`] applies everything under a project root
//!
//! # Example
//!
//! ```no_run
//! use archpatch_core::Runner;
//!
//! let runner = Runner::new(".").dry_run(true);
//! runner.check_project_root()?;
//! let report = runner.run()?;
//! println!("{}", report.to_json()?);
//! # Ok::<(), archpatch_core::PatchError>(())
//! ```
//!
//! # Limitations
//!
//! Nothing here parses Starlark, Python, or shell. Anchors that drift by a
//! single space no longer match and the corresponding rewrite silently does
//! nothing; patched files are never build-checked.

pub mod backup;
pub mod detect;
pub mod duplicate;
pub mod patches;
pub mod runner;
pub mod types;

pub use detect::is_already_patched;
pub use duplicate::{BlockDuplicator, Duplication, TokenRule, TokenRules, duplicate_block};
pub use patches::FilePatch;
pub use runner::{PROJECT_ROOT_MARKER, Runner};
pub use types::{PatchError, RunReport, StepReport, StepStatus};
