//! `third-party/webrtc/BUILD`: x86_64 sources and flags.
//!
//! WebRTC's NEON sources cannot build for Intel, so the x86_64 branches get a
//! short list of generic C replacements and the x86 family defines instead of
//! the arm64 lists.

use super::FilePatch;
use crate::detect::SIM_X86_64_LITERAL;

pub(crate) const ARCH_SPECIFIC_SOURCES: &str = r#"arch_specific_sources = select({
    "@build_bazel_rules_apple//apple:ios_arm64": common_arm_specific_sources + arm64_specific_sources,
    "//build-system:ios_sim_arm64": common_arm_specific_sources + arm64_specific_sources,
})"#;

const ARCH_SPECIFIC_SOURCES_X86_64: &str = r#"# x86_64 uses generic C implementations instead of NEON
x86_64_specific_sources = ["webrtc/" + path for path in [
    "common_audio/signal_processing/complex_bit_reverse.c",
    "common_audio/signal_processing/filter_ar_fast_q12.c",
]]

arch_specific_sources = select({
    "@build_bazel_rules_apple//apple:ios_arm64": common_arm_specific_sources + arm64_specific_sources,
    "//build-system:ios_sim_arm64": common_arm_specific_sources + arm64_specific_sources,
    "//build-system:ios_sim_x86_64": x86_64_specific_sources,
    "//build-system:ios_x86_64": x86_64_specific_sources,
    "//conditions:default": x86_64_specific_sources,
})"#;

pub(crate) const ARCH_SPECIFIC_CFLAGS: &str = r#"arch_specific_cflags = select({
    "@build_bazel_rules_apple//apple:ios_arm64": common_flags + arm64_specific_flags,
    "//build-system:ios_sim_arm64": common_flags + arm64_specific_flags,
})"#;

const ARCH_SPECIFIC_CFLAGS_X86_64: &str = r#"x86_64_specific_flags = [
    "-DWEBRTC_ARCH_X86_64",
    "-DWEBRTC_ARCH_X86_FAMILY",
]

arch_specific_cflags = select({
    "@build_bazel_rules_apple//apple:ios_arm64": common_flags + arm64_specific_flags,
    "//build-system:ios_sim_arm64": common_flags + arm64_specific_flags,
    "//build-system:ios_sim_x86_64": common_flags + x86_64_specific_flags,
    "//build-system:ios_x86_64": common_flags + x86_64_specific_flags,
    "//conditions:default": common_flags + x86_64_specific_flags,
})"#;

/// Rewrites the `arch_specific_sources` and `arch_specific_cflags` selects.
///
/// Both anchors are matched verbatim; any whitespace drift in the target file
/// makes the corresponding rewrite a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebrtcArchSelects;

impl FilePatch for WebrtcArchSelects {
    fn path(&self) -> &str {
        "third-party/webrtc/BUILD"
    }

    fn marker(&self) -> &str {
        SIM_X86_64_LITERAL
    }

    fn anchor(&self) -> &str {
        "verbatim arch_specific_sources and arch_specific_cflags selects"
    }

    fn dry_run_summary(&self) -> &str {
        "Would add x86_64 support to arch_specific_sources and arch_specific_cflags"
    }

    fn apply(&self, content: &str) -> String {
        content
            .replace(ARCH_SPECIFIC_SOURCES, ARCH_SPECIFIC_SOURCES_X86_64)
            .replace(ARCH_SPECIFIC_CFLAGS, ARCH_SPECIFIC_CFLAGS_X86_64)
    }
}
