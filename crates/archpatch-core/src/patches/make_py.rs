//! `build-system/Make/Make.py`: x86_64 simulator build configurations.

use super::FilePatch;
use crate::detect::MAKE_CONFIGURATION_LITERAL;

pub(crate) const RELEASE_ARM64_CASE: &str = "        elif configuration == 'release_arm64':
            self.configuration_args = [
                # bazel optimized build configuration
                '-c', 'opt',

                # Build single-architecture binaries. It is almost 2 times faster is 32-bit support is not required.
                '--ios_multi_cpus=arm64',

                # Always build universal Watch binaries.
                '--watchos_cpus=arm64_32',

                # Generate DSYM files when building.
                '--apple_generate_dsym',

                # Require DSYM files as build output.
                '--output_groups=+dsyms',
            ] + self.common_release_args
        else:
            raise Exception('Unknown configuration {}'.format(configuration))";

const SIM_X86_64_CASES: &str = "        elif configuration == 'debug_sim_x86_64':
            self.configuration_args = [
                # bazel debug build configuration
                '-c', 'dbg',

                # Build for x86_64 simulator (Intel Macs)
                '--ios_multi_cpus=x86_64',

                # Always build universal Watch binaries.
                '--watchos_cpus=arm64_32'
            ] + self.common_debug_args
        elif configuration == 'release_sim_x86_64':
            self.configuration_args = [
                # bazel optimized build configuration
                '-c', 'opt',

                # Build for x86_64 simulator (Intel Macs)
                '--ios_multi_cpus=x86_64',

                # Always build universal Watch binaries.
                '--watchos_cpus=arm64_32'
            ] + self.common_release_args
";

pub(crate) const BUILD_CHOICES: &str = "        choices=[
            'debug_arm64',
            'debug_sim_arm64',
            'release_sim_arm64',
            'release_arm64',
        ],
        required=True,
        help='Build configuration'";

const BUILD_CHOICES_X86_64: &str = "        choices=[
            'debug_arm64',
            'debug_sim_arm64',
            'release_sim_arm64',
            'release_arm64',
            'debug_sim_x86_64',
            'release_sim_x86_64',
        ],
        required=True,
        help='Build configuration'";

/// Where the new cases go: right before the final `else:`.
const ELSE_CLAUSE: &str = "        else:
            raise Exception('Unknown configuration {}'.format(configuration))";

/// Adds `debug_sim_x86_64` and `release_sim_x86_64` to `set_configuration`
/// and to the `build` command's `--configuration` choices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConfigurations;

impl MakeConfigurations {
    fn configuration_cases() -> String {
        let head = &RELEASE_ARM64_CASE[..RELEASE_ARM64_CASE.len() - ELSE_CLAUSE.len()];
        format!("{head}{SIM_X86_64_CASES}{ELSE_CLAUSE}")
    }
}

impl FilePatch for MakeConfigurations {
    fn path(&self) -> &str {
        "build-system/Make/Make.py"
    }

    fn marker(&self) -> &str {
        MAKE_CONFIGURATION_LITERAL
    }

    fn anchor(&self) -> &str {
        "release_arm64 case before the final else, and the --configuration choices"
    }

    fn dry_run_summary(&self) -> &str {
        "Would add debug_sim_x86_64 and release_sim_x86_64 configurations"
    }

    fn success_message(&self) -> &str {
        "Successfully added debug_sim_x86_64 and release_sim_x86_64 configurations"
    }

    fn apply(&self, content: &str) -> String {
        content
            .replace(RELEASE_ARM64_CASE, &Self::configuration_cases())
            .replace(BUILD_CHOICES, BUILD_CHOICES_X86_64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_py() -> String {
        format!(
            "class BazelCommandLine:\n    def set_configuration(self, configuration):\n        if configuration == 'debug_arm64':\n            pass\n{RELEASE_ARM64_CASE}\n\n\ndef add_build_arguments(parser):\n    parser.add_argument(\n        '--configuration',\n{BUILD_CHOICES}\n    )\n"
        )
    }

    #[test]
    fn test_release_case_ends_with_else_clause() {
        assert!(RELEASE_ARM64_CASE.ends_with(ELSE_CLAUSE));
    }

    #[test]
    fn test_adds_cases_before_else() {
        let out = MakeConfigurations.apply(&make_py());
        let debug = out.find("elif configuration == 'debug_sim_x86_64':").unwrap();
        let release = out.find("elif configuration == 'release_sim_x86_64':").unwrap();
        let release_arm64 = out.find("elif configuration == 'release_arm64':").unwrap();
        let unknown = out.find("raise Exception('Unknown configuration").unwrap();
        assert!(release_arm64 < debug && debug < release && release < unknown);
        assert!(out.contains("            ] + self.common_debug_args\n        elif configuration == 'release_sim_x86_64':"));
        assert!(out.contains("            ] + self.common_release_args\n        else:\n"));
    }

    #[test]
    fn test_adds_choices() {
        let out = MakeConfigurations.apply(&make_py());
        assert!(out.contains("            'release_arm64',\n            'debug_sim_x86_64',\n            'release_sim_x86_64',\n        ],"));
    }

    #[test]
    fn test_preserves_unrelated_text() {
        let out = MakeConfigurations.apply(&make_py());
        assert!(out.starts_with("class BazelCommandLine:\n"));
        assert!(out.ends_with("help='Build configuration'\n    )\n"));
    }
}
