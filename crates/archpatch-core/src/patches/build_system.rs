//! `build-system/BUILD`: CPU config settings.

use super::FilePatch;
use crate::detect::SIM_X86_64_LITERAL;

/// Replacement content for `build-system/BUILD`.
///
/// Both x86_64 settings key on the `ios_x86_64` cpu; Bazel has no separate
/// cpu value for the Intel simulator.
pub const CONFIG_SETTINGS: &str = r#"
config_setting(
	name = "ios_sim_arm64",
	values = {"cpu": "ios_sim_arm64"},
)

config_setting(
	name = "ios_sim_x86_64",
	values = {"cpu": "ios_x86_64"},
)

config_setting(
	name = "ios_x86_64",
	values = {"cpu": "ios_x86_64"},
)

exports_files([
    "GenerateStrings/GenerateStrings.py",
])
"#;

/// Overwrites the whole file with [`CONFIG_SETTINGS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildSystemConfigSettings;

impl FilePatch for BuildSystemConfigSettings {
    fn path(&self) -> &str {
        "build-system/BUILD"
    }

    fn marker(&self) -> &str {
        SIM_X86_64_LITERAL
    }

    fn anchor(&self) -> &str {
        "none, the whole file is replaced"
    }

    fn dry_run_summary(&self) -> &str {
        "Would replace entire file with x86_64 config settings"
    }

    fn success_message(&self) -> &str {
        "Successfully added ios_sim_x86_64 and ios_x86_64 config settings"
    }

    fn apply(&self, _content: &str) -> String {
        CONFIG_SETTINGS.to_string()
    }
}
