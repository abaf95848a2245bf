//! Genrule `BUILD` files: duplicate the `ios_sim_arm64` shell branch.
//!
//! Third-party libraries such as ffmpeg and opus build through shell genrules
//! that branch on `$(TARGET_CPU)`. For each `ios_sim_arm64` branch an
//! `ios_x86_64` branch is added with every `aarch64`/`arm64` token rewritten.

use crate::detect::GENRULE_LITERAL;
use crate::duplicate::{BlockDuplicator, Duplication, TokenRules};

/// Marker line that opens the branch to duplicate.
pub const SIM_ARM64_BRANCH: &str = r#"elif [ "$(TARGET_CPU)" == "ios_sim_arm64" ]; then"#;

/// Header of the inserted branch.
pub const X86_64_BRANCH: &str = r#"elif [ "$(TARGET_CPU)" == "ios_x86_64" ]; then"#;

/// Genrule files patched by default, relative to the project root.
pub const DEFAULT_GENRULE_FILES: &[&str] = &[
    "submodules/ffmpeg/BUILD",
    "third-party/opus/BUILD",
    "third-party/libjxl/BUILD",
    "third-party/webp/BUILD",
    "third-party/td/BUILD",
    "third-party/libvpx/BUILD",
    "third-party/dav1d/BUILD",
    "third-party/mozjpeg/BUILD",
];

/// Rules for the duplicated body, `aarch64` first so triples are rewritten whole.
pub fn x86_64_token_rules() -> TokenRules {
    TokenRules::new()
        .rule("aarch64", "x86_64")
        .rule("arm64", "x86_64")
}

pub fn duplicator() -> BlockDuplicator {
    BlockDuplicator::new(SIM_ARM64_BRANCH, X86_64_BRANCH).rules(x86_64_token_rules())
}

/// Literal whose presence marks a genrule file as done.
pub fn marker() -> &'static str {
    GENRULE_LITERAL
}

/// Duplicates every `ios_sim_arm64` branch in `content`.
pub fn apply(content: &str) -> Duplication {
    duplicator().apply(content)
}
