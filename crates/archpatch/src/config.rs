//! Configuration file support for archpatch.
//!
//! An optional `archpatch.toml` lets a project pin its own genrule file list
//! instead of passing `--genrule-file` on every run.
//!
//! ## Configuration File Location
//!
//! The configuration file is searched for in the following order:
//! 1. The project root (`<root>/archpatch.toml`)
//! 2. Parent directories (up to the repository root or filesystem root)
//!
//! ## Example Configuration
//!
//! ```toml
//! [genrules]
//! files = [
//!     "submodules/ffmpeg/BUILD",
//!     "third-party/opus/BUILD",
//! ]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "archpatch.toml";

/// Root configuration structure for `archpatch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchpatchConfig {
    /// Genrule pass configuration.
    pub genrules: GenrulesConfig,
}

/// Genrule pass configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenrulesConfig {
    /// Genrule `BUILD` files to patch, relative to the project root.
    ///
    /// Replaces the built-in list when set.
    pub files: Option<Vec<String>>,
}

impl ArchpatchConfig {
    /// Loads configuration from the specified file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: ArchpatchConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Attempts to find and load configuration starting from the specified directory.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((config, path)))` - Found and loaded configuration with its path
    /// * `Ok(None)` - No configuration file found
    /// * `Err` - If a config file was found but couldn't be parsed
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_relative_to(start_dir, &cwd)
    }

    /// Like [`Self::discover_from`], resolving a relative `start_dir` against `base`.
    fn discover_relative_to(start_dir: &Path, base: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = absolute_from(start_dir, base);

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            // Stop at repository root or filesystem root
            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }
}

/// Joins `path` onto `base` and folds away `.` and `..` without touching the
/// filesystem, so walking up with `pop()` visits real parent directories.
fn absolute_from(path: &Path, base: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in base.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}

/// Configuration resolver that merges config file values with CLI arguments.
///
/// CLI arguments always take precedence over config file values.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    /// Loaded configuration, if any.
    pub config: Option<ArchpatchConfig>,

    /// Path to the loaded config file, if any.
    pub config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Loads `explicit` if given, otherwise discovers a config from `project_root`.
    pub fn new(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self {
                config: Some(ArchpatchConfig::load_from_file(path)?),
                config_path: Some(path.to_path_buf()),
            });
        }

        match ArchpatchConfig::discover_from(project_root)? {
            Some((config, path)) => Ok(Self {
                config: Some(config),
                config_path: Some(path),
            }),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the genrule file list: CLI first, then config, else `None`
    /// (use the built-in list).
    pub fn resolve_genrule_files(&self, cli_files: &[String]) -> Option<Vec<String>> {
        if !cli_files.is_empty() {
            return Some(cli_files.to_vec());
        }
        self.config
            .as_ref()
            .and_then(|config| config.genrules.files.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ArchpatchConfig::default();
        assert!(config.genrules.files.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "[genrules]\nfiles = [\"third-party/opus/BUILD\", \"third-party/td/BUILD\"]\n",
        )
        .unwrap();

        let config = ArchpatchConfig::load_from_file(&config_path).unwrap();
        assert_eq!(
            config.genrules.files,
            Some(vec![
                "third-party/opus/BUILD".to_string(),
                "third-party/td/BUILD".to_string()
            ])
        );
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();
        assert_eq!(
            ArchpatchConfig::load_from_file(&config_path).unwrap(),
            ArchpatchConfig::default()
        );
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[genrules]\nfiles = \"not-a-list\"\n").unwrap();
        let err = ArchpatchConfig::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_discover_from_parent() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("ios/project");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[genrules]\nfiles = []\n",
        )
        .unwrap();

        let (config, path) = ArchpatchConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.genrules.files, Some(vec![]));
    }

    #[test]
    fn test_discover_from_relative_start_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("ios/project");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[genrules]\nfiles = [\"third-party/td/BUILD\"]\n",
        )
        .unwrap();
        let expected = temp_dir.path().join(CONFIG_FILE_NAME);

        for start in [".", "./", "../project"] {
            let (config, path) = ArchpatchConfig::discover_relative_to(Path::new(start), &nested)
                .unwrap()
                .unwrap_or_else(|| panic!("nothing found from {start:?}"));
            assert_eq!(path, expected, "from {start:?}");
            assert_eq!(
                config.genrules.files,
                Some(vec!["third-party/td/BUILD".to_string()])
            );
        }
    }

    #[test]
    fn test_absolute_from() {
        let base = Path::new("/work/ios/project");
        assert_eq!(absolute_from(Path::new("."), base), PathBuf::from("/work/ios/project"));
        assert_eq!(absolute_from(Path::new("../other"), base), PathBuf::from("/work/ios/other"));
        assert_eq!(absolute_from(Path::new("/abs/root"), base), PathBuf::from("/abs/root"));
    }

    #[test]
    fn test_discover_stops_at_git_root() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        assert!(ArchpatchConfig::discover_from(&repo).unwrap().is_none());
    }

    #[test]
    fn test_cli_files_win() {
        let resolver = ConfigResolver {
            config: Some(ArchpatchConfig {
                genrules: GenrulesConfig {
                    files: Some(vec!["third-party/webp/BUILD".to_string()]),
                },
            }),
            config_path: None,
        };

        assert_eq!(
            resolver.resolve_genrule_files(&["third-party/td/BUILD".to_string()]),
            Some(vec!["third-party/td/BUILD".to_string()])
        );
        assert_eq!(
            resolver.resolve_genrule_files(&[]),
            Some(vec!["third-party/webp/BUILD".to_string()])
        );
        assert_eq!(ConfigResolver::default().resolve_genrule_files(&[]), None);
    }
}
