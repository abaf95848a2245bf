//! `select()` branch insertion for third-party `BUILD` files.
//!
//! Every rewrite here has the same shape: find the `ios_sim_arm64` branch of a
//! `select({...})` that is the last one before the closing `})`, and insert
//! branches for the two x86_64 settings and `//conditions:default` between it
//! and the close.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::FilePatch;
use crate::detect::SIM_X86_64_LITERAL;

/// Labels inserted after the anchor branch, in order.
pub const X86_64_BRANCH_LABELS: [&str; 3] = [
    "//build-system:ios_sim_x86_64",
    "//build-system:ios_x86_64",
    "//conditions:default",
];

static LIBYUV_CFLAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(arch_specific_cflags\s*=\s*select\(\{[^}]*"//build-system:ios_sim_arm64":\s*common_flags\s*\+\s*arm64_specific_flags,)(\s*\}\))"#,
    )
    .expect("Invalid libyuv cflags regex")
});
static OPENH264_SOURCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("//build-system:ios_sim_arm64":\s*arm64_specific_sources,)(\s*\}\))"#)
        .expect("Invalid openh264 sources regex")
});
static OPENH264_COPTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("//build-system:ios_sim_arm64":\s*arm64_specific_copts,)(\s*\}\))"#)
        .expect("Invalid openh264 copts regex")
});
static OPENH264_TEXTUAL_HDRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("//build-system:ios_sim_arm64":\s*arm64_specific_textual_hdrs,)(\s*\}\))"#)
        .expect("Invalid openh264 textual_hdrs regex")
});
static COMMON_FLAGS_ARM64: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"("//build-system:ios_sim_arm64":\s*common_flags\s*\+\s*arm64_specific_flags,)(\s*\}\))"#,
    )
    .expect("Invalid common_flags regex")
});
static LIST_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("//build-system:ios_sim_arm64":\s*\[[^\]]*\],)(\s*\}\))"#)
        .expect("Invalid list literal regex")
});

/// One anchored insertion.
///
/// `anchor` must have two groups: the anchor branch itself and the whitespace
/// plus `})` that closes the select. Every match is rewritten.
#[derive(Debug, Clone, Copy)]
pub struct SelectBranchInsertion {
    anchor: &'static Regex,
    value: &'static str,
}

impl SelectBranchInsertion {
    pub fn new(anchor: &'static Regex, value: &'static str) -> Self {
        Self { anchor, value }
    }

    /// The three branch lines, each mapping to `value`, joined by `\n`.
    pub fn branches(&self) -> String {
        X86_64_BRANCH_LABELS
            .iter()
            .map(|label| format!("    \"{label}\": {},", self.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn apply(&self, content: &str) -> String {
        let branches = self.branches();
        self.anchor
            .replace_all(content, |caps: &Captures| {
                format!("{}\n{}{}", &caps[1], branches, &caps[2])
            })
            .into_owned()
    }
}

/// A file patch made of one or more [`SelectBranchInsertion`]s, applied in order.
#[derive(Debug, Clone)]
pub struct SelectPatch {
    path: &'static str,
    insertions: Vec<SelectBranchInsertion>,
    anchor: String,
}

impl SelectPatch {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            insertions: Vec::new(),
            anchor: String::new(),
        }
    }

    pub fn insert(mut self, anchor: &'static Regex, value: &'static str) -> Self {
        self.insertions.push(SelectBranchInsertion::new(anchor, value));
        self.anchor = match self.insertions.len() {
            1 => "ios_sim_arm64 branch closing a select()".to_string(),
            n => format!("ios_sim_arm64 branch closing a select() ({n} anchors)"),
        };
        self
    }
}

impl FilePatch for SelectPatch {
    fn path(&self) -> &str {
        self.path
    }

    fn marker(&self) -> &str {
        SIM_X86_64_LITERAL
    }

    fn anchor(&self) -> &str {
        &self.anchor
    }

    fn dry_run_summary(&self) -> &str {
        "Would add x86_64 support to select() statements"
    }

    fn apply(&self, content: &str) -> String {
        self.insertions
            .iter()
            .fold(content.to_string(), |acc, insertion| insertion.apply(&acc))
    }
}

/// `third-party/libyuv/BUILD`: plain `common_flags` for x86_64.
pub fn libyuv() -> SelectPatch {
    SelectPatch::new("third-party/libyuv/BUILD").insert(&LIBYUV_CFLAGS, "common_flags")
}

/// `third-party/openh264/BUILD`: no arch sources, copts, or textual headers.
pub fn openh264() -> SelectPatch {
    SelectPatch::new("third-party/openh264/BUILD")
        .insert(&OPENH264_SOURCES, "[]")
        .insert(&OPENH264_COPTS, "[]")
        .insert(&OPENH264_TEXTUAL_HDRS, "[]")
}

/// `third-party/webrtc/libsrtp/BUILD`: plain `common_flags` for x86_64.
pub fn libsrtp() -> SelectPatch {
    SelectPatch::new("third-party/webrtc/libsrtp/BUILD").insert(&COMMON_FLAGS_ARM64, "common_flags")
}

/// `third-party/webrtc/crc32c/BUILD`: empty lists wherever arm64 has a list literal.
pub fn crc32c() -> SelectPatch {
    SelectPatch::new("third-party/webrtc/crc32c/BUILD").insert(&LIST_LITERAL, "[]")
}
