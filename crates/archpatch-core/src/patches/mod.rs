//! Per-file patches.
//!
//! Each patch is a pure text rewrite over one hardcoded file plus the
//! metadata the runner needs to report on it. None of them parse Starlark or
//! Python: they anchor on exact strings or narrow regexes, and content with no
//! matching anchor comes back unchanged.
//!
//! | Step | Patch | File |
//! |------|-------|------|
//! | 1 | [`BuildSystemConfigSettings`] | `build-system/BUILD` |
//! | 2 | [`WebrtcArchSelects`] | `third-party/webrtc/BUILD` |
//! | 3 | [`select::libyuv`] | `third-party/libyuv/BUILD` |
//! | 4 | [`select::openh264`] | `third-party/openh264/BUILD` |
//! | 5 | [`select::libsrtp`] | `third-party/webrtc/libsrtp/BUILD` |
//! | 6 | [`select::crc32c`] | `third-party/webrtc/crc32c/BUILD` |
//! | 7 | [`MakeConfigurations`] | `build-system/Make/Make.py` |
//! | 8 | [`genrule`] | genrule `BUILD` files |

pub mod build_system;
pub mod genrule;
pub mod make_py;
pub mod select;
pub mod webrtc;

pub use build_system::BuildSystemConfigSettings;
pub use make_py::MakeConfigurations;
pub use select::{SelectBranchInsertion, SelectPatch};
pub use webrtc::WebrtcArchSelects;

/// A rewrite of one file, identified by its path under the project root.
pub trait FilePatch {
    /// Path relative to the project root.
    fn path(&self) -> &str;

    /// Literal whose presence means the file is already patched.
    fn marker(&self) -> &str;

    /// What the rewrite looks for in the file, printed in verbose mode.
    fn anchor(&self) -> &str;

    /// What a dry run reports it would do.
    fn dry_run_summary(&self) -> &str;

    /// Printed after a successful write.
    fn success_message(&self) -> &str {
        "Successfully added x86_64 support"
    }

    /// Rewrites `content`. Must not fail; a missing anchor leaves the text as is.
    fn apply(&self, content: &str) -> String;
}

/// The fixed file steps, in the order they run.
pub fn standard_patches() -> Vec<Box<dyn FilePatch>> {
    vec![
        Box::new(BuildSystemConfigSettings),
        Box::new(WebrtcArchSelects),
        Box::new(select::libyuv()),
        Box::new(select::openh264()),
        Box::new(select::libsrtp()),
        Box::new(select::crc32c()),
        Box::new(MakeConfigurations),
    ]
}
