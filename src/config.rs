//! Run configuration and file filtering.
//!
//! Two kinds of files are left alone by every strategy:
//! - The fixed ignore set (`.gitattributes`, `.gitignore`), matched by exact,
//!   case-sensitive file name. Configuration can never un-ignore these.
//! - Whatever an optional TOML configuration file excludes on top of that.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organize]
//! strategy = "extension"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part", "node_modules/**"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Glob patterns are matched against the path relative to the folder being
//! organized; regexes against the bare file name.

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File names that no strategy ever moves, renames or deletes.
pub const IGNORE_SET: [&str; 2] = [".gitattributes", ".gitignore"];

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".reorgrc.toml";

/// Returns true if `file_name` is in the fixed ignore set.
pub fn is_ignored(file_name: &str) -> bool {
    IGNORE_SET.contains(&file_name)
}

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerConfig {
    #[serde(default)]
    pub organize: OrganizeSettings,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Defaults for the organize run itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeSettings {
    /// Strategy used when none is given on the command line. Accepts the
    /// short name (`extension`) or the full label (`File Extension`).
    #[serde(default)]
    pub strategy: Option<String>,
}

/// Filter rules applied on top of the ignore set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether files starting with "." are organized. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part", "node_modules/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, case-insensitive (e.g., "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.reorgrc.toml` in the current directory
    /// 3. Look for `~/.config/reorg/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("reorg")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the filter rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Filter rules with every pattern pre-compiled.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl Default for CompiledFilters {
    /// Filters that exclude nothing beyond the ignore set.
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

impl CompiledFilters {
    /// Create compiled filters from filter rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    pub fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should be organized.
    ///
    /// `relative_path` is the file's path relative to the folder being
    /// organized. Checks run in this order, stopping at the first hit:
    /// 1. Ignore set - always excluded
    /// 2. Include patterns (whitelist) - included
    /// 3. Hidden file filter
    /// 4. Exact filename match
    /// 5. File extension match
    /// 6. Glob pattern match
    /// 7. Regex pattern match
    /// 8. Default: include
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if is_ignored(&file_name) {
            return false;
        }

        if self.matches_any(&self.include_patterns, relative_path) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = relative_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.matches_any(&self.exclude_patterns, relative_path) {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }

    fn matches_any(&self, patterns: &[Pattern], path: &Path) -> bool {
        patterns.iter().any(|pattern| pattern.matches_path(path))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filters(exclude: ExcludeRules, include: Vec<&str>, hidden: bool) -> CompiledFilters {
        let rules = FilterRules {
            enable_hidden_files: hidden,
            exclude,
            include: IncludeRules {
                patterns: include.into_iter().map(String::from).collect(),
            },
        };
        CompiledFilters::new(&rules).expect("rules should compile")
    }

    #[test]
    fn test_ignore_set_is_exact_and_case_sensitive() {
        assert!(is_ignored(".gitignore"));
        assert!(is_ignored(".gitattributes"));
        assert!(!is_ignored(".GITIGNORE"));
        assert!(!is_ignored("gitignore"));
        assert!(!is_ignored(".gitignore.bak"));
    }

    #[test]
    fn test_default_filters_only_drop_ignore_set() {
        let compiled = CompiledFilters::default();

        assert!(!compiled.should_include(Path::new(".gitignore")));
        assert!(!compiled.should_include(Path::new("sub/.gitattributes")));
        assert!(compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new("photo.png")));
    }

    #[test]
    fn test_default_config_compiles() {
        let config = OrganizerConfig::default();
        assert!(config.filters.enable_hidden_files);
        assert!(config.organize.strategy.is_none());
        assert!(config.compile_filters().is_ok());
    }

    #[test]
    fn test_include_cannot_override_ignore_set() {
        let compiled = filters(ExcludeRules::default(), vec!["*"], true);
        assert!(!compiled.should_include(Path::new(".gitignore")));
        assert!(compiled.should_include(Path::new("anything.txt")));
    }

    #[test]
    fn test_hidden_files_excluded_when_disabled() {
        let compiled = filters(ExcludeRules::default(), vec![".important"], false);

        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new(".important")));
        assert!(compiled.should_include(Path::new("visible.txt")));
    }

    #[test]
    fn test_exclude_filenames_and_extensions() {
        let compiled = filters(
            ExcludeRules {
                filenames: vec!["Thumbs.db".to_string()],
                extensions: vec!["tmp".to_string(), ".part".to_string()],
                ..Default::default()
            },
            vec![],
            true,
        );

        assert!(!compiled.should_include(Path::new("Thumbs.db")));
        assert!(!compiled.should_include(Path::new("download.TMP")));
        assert!(!compiled.should_include(Path::new("movie.part")));
        assert!(compiled.should_include(Path::new("image.jpg")));
    }

    #[test]
    fn test_exclude_glob_on_relative_path() {
        let compiled = filters(
            ExcludeRules {
                patterns: vec!["node_modules/**".to_string(), "*.cache".to_string()],
                ..Default::default()
            },
            vec![],
            true,
        );

        assert!(!compiled.should_include(Path::new("node_modules/pkg/index.js")));
        assert!(!compiled.should_include(Path::new("build.cache")));
        assert!(compiled.should_include(Path::new("src/index.js")));
    }

    #[test]
    fn test_exclude_regex_on_file_name() {
        let compiled = filters(
            ExcludeRules {
                regex: vec![r"^~\$".to_string()],
                ..Default::default()
            },
            vec![],
            true,
        );

        assert!(!compiled.should_include(Path::new("docs/~$report.docx")));
        assert!(compiled.should_include(Path::new("docs/report.docx")));
    }

    #[test]
    fn test_invalid_patterns_return_errors() {
        let bad_regex = FilterRules {
            exclude: ExcludeRules {
                regex: vec!["[invalid(".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(&bad_regex),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));

        let bad_glob = FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(&bad_glob),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config = OrganizerConfig::from_toml(
            r#"
            [organize]
            strategy = "unorganize"

            [filters]
            enable_hidden_files = false

            [filters.exclude]
            extensions = ["log"]
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.organize.strategy.as_deref(), Some("unorganize"));
        assert!(!config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.extensions, vec!["log"]);
        assert!(config.filters.include.patterns.is_empty());
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config = OrganizerConfig::from_toml("").expect("empty config should parse");
        assert!(config.filters.enable_hidden_files);
        assert!(config.organize.strategy.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = OrganizerConfig::from_toml("[filters\nbroken");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("reorg.toml");
        fs::write(&path, "[organize]\nstrategy = \"random\"\n").expect("Failed to write config");

        let config = OrganizerConfig::load(Some(&path)).expect("config should load");
        assert_eq!(config.organize.strategy.as_deref(), Some("random"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = OrganizerConfig::load(Some(Path::new("/non/existent/reorg.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }
}
