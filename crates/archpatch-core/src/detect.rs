//! Already-patched detection.

/// Literal whose presence marks a `BUILD` file as already carrying the
/// x86_64 simulator `select()` branches.
pub const SIM_X86_64_LITERAL: &str = "ios_sim_x86_64";

/// Literal whose presence marks `Make.py` as already carrying the new
/// configurations.
pub const MAKE_CONFIGURATION_LITERAL: &str = "debug_sim_x86_64";

/// Literal whose presence marks a genrule `BUILD` file as already duplicated.
pub const GENRULE_LITERAL: &str = "ios_x86_64";

/// Returns `true` if `content` contains `literal` anywhere.
///
/// This is a coarse check: an unrelated occurrence of the literal (a comment,
/// a partial manual edit) makes the file count as patched.
pub fn is_already_patched(content: &str, literal: &str) -> bool {
    content.contains(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_literal_anywhere() {
        assert!(is_already_patched(
            "# see ios_sim_x86_64 later\n",
            SIM_X86_64_LITERAL
        ));
        assert!(!is_already_patched(
            "\"//build-system:ios_sim_arm64\": common_flags,",
            SIM_X86_64_LITERAL
        ));
    }

    #[test]
    fn test_genrule_literal_is_distinct_from_sim_literal() {
        assert!(!is_already_patched(SIM_X86_64_LITERAL, GENRULE_LITERAL));
        assert!(is_already_patched(
            "\"//build-system:ios_x86_64\": [],",
            GENRULE_LITERAL
        ));
    }
}
