//! Run configuration: where files come from, where each category goes, and
//! the settings that shape a run.
//!
//! Configuration is read from JSON (the primary format) or TOML, chosen by the
//! file extension. Loading happens in three phases so that each kind of
//! mistake gets its own error:
//!
//! 1. the document is parsed generically ([`ConfigError::Syntax`]),
//! 2. the required top-level keys are checked ([`ConfigError::MissingKey`]),
//! 3. the document is deserialized into [`Config`] ([`ConfigError::Invalid`]).
//!
//! A validated config is then checked for semantic problems such as broken
//! glob patterns or strftime strings.
//!
//! ```json
//! {
//!   "source_directory": "/home/me/Downloads",
//!   "target_directories": {
//!     "documents": { "path": "/home/me/Documents", "extensions": [".pdf", ".txt"] },
//!     "images": { "path": "/home/me/Pictures", "extensions": [".jpg", ".png"] }
//!   },
//!   "exclude_patterns": ["*.tmp", ".*"],
//!   "settings": {
//!     "create_subdirectories_by_date": true,
//!     "date_format": "%Y-%m",
//!     "handle_duplicates": "rename"
//!   }
//! }
//! ```

use chrono::format::{Item, StrftimeItems};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::filters::ExclusionFilter;

/// Top-level keys every configuration document must carry.
pub const REQUIRED_KEYS: [&str; 3] = ["source_directory", "target_directories", "settings"];

/// Default configuration file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default activity log file name.
pub const DEFAULT_LOG_FILE: &str = "file_router.log";

/// Categories written by [`Config::template`], in precedence order.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "documents",
        &[
            ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx",
        ],
    ),
    (
        "images",
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp", ".ico",
        ],
    ),
    (
        "videos",
        &[
            ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".3gp",
        ],
    ),
    (
        "audio",
        &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".opus"],
    ),
    (
        "archives",
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz"],
    ),
    (
        "executables",
        &[".exe", ".msi", ".deb", ".rpm", ".dmg", ".pkg"],
    ),
    (
        "code",
        &[
            ".py", ".js", ".html", ".css", ".java", ".cpp", ".c", ".h", ".php", ".rb", ".go", ".rs",
        ],
    ),
];

const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.tmp", "*.temp", "~*", ".*"];

/// Errors raised while loading, validating or saving configuration.
///
/// All of these are fatal: they are reported before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be read or written.
    #[error("IO error on configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not well-formed JSON/TOML.
    #[error("Malformed configuration: {0}")]
    Syntax(String),
    /// A required top-level key is absent.
    #[error("Configuration is missing required key '{0}'")]
    MissingKey(&'static str),
    /// The document is well-formed but does not match the schema.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// An exclusion pattern is not a valid glob.
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// The date bucket format is empty or not a valid strftime string.
    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),
    /// The configuration could not be serialized for saving.
    #[error("Could not serialize configuration: {0}")]
    Serialize(String),
}

/// Document format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// What to do when the destination file name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append `_001`, `_002`, ... to the stem until a free name is found.
    #[default]
    Rename,
    /// Leave the source file where it is.
    Skip,
    /// Replace the existing destination file.
    Overwrite,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicatePolicy::Rename => "rename",
            DuplicatePolicy::Skip => "skip",
            DuplicatePolicy::Overwrite => "overwrite",
        };
        f.write_str(name)
    }
}

/// Log threshold as written in configuration (`"INFO"`, `"debug"`, `"WARNING"`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(LevelFilter);

impl LogLevel {
    pub fn new(filter: LevelFilter) -> Self {
        Self(filter)
    }

    pub fn filter(self) -> LevelFilter {
        self.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(LevelFilter::Info)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => LevelFilter::Trace,
            "DEBUG" => LevelFilter::Debug,
            "INFO" => LevelFilter::Info,
            "WARN" | "WARNING" => LevelFilter::Warn,
            "ERROR" | "CRITICAL" => LevelFilter::Error,
            "OFF" => LevelFilter::Off,
            other => return Err(format!("unknown log level '{}'", other)),
        };
        Ok(Self(filter))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        let name = match level.0 {
            LevelFilter::Off => "OFF",
            LevelFilter::Error => "ERROR",
            LevelFilter::Warn => "WARNING",
            LevelFilter::Info => "INFO",
            LevelFilter::Debug => "DEBUG",
            LevelFilter::Trace => "TRACE",
        };
        name.to_string()
    }
}

/// A named category: one destination directory and the extensions routed there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirectory {
    /// Category name, e.g. `"images"`.
    pub name: String,
    /// Base destination directory.
    pub path: PathBuf,
    /// Recognized extensions, lower case, each with the leading `.`.
    pub extensions: Vec<String>,
}

/// Run settings. Every field has a default so partial documents are fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Walk subdirectories of the source directory.
    #[serde(default)]
    pub recursive: bool,

    /// Put files into a subdirectory named after their modification date.
    #[serde(default)]
    pub create_subdirectories_by_date: bool,

    /// strftime format of the date subdirectory.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub handle_duplicates: DuplicatePolicy,

    /// Smallest size in bytes that is still routed.
    #[serde(default)]
    pub min_file_size: u64,

    /// Largest size in bytes that is still routed; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,

    /// Compute and log moves without touching the filesystem.
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Append-only activity log location.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_date_format() -> String {
    "%Y-%m".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recursive: false,
            create_subdirectories_by_date: false,
            date_format: default_date_format(),
            handle_duplicates: DuplicatePolicy::default(),
            min_file_size: 0,
            max_file_size: None,
            dry_run: false,
            log_level: LogLevel::default(),
            log_file: default_log_file(),
        }
    }
}

/// A fully validated configuration, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub source_directory: PathBuf,

    /// Glob patterns matched case-insensitively against bare file names.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Categories in document order; the first matching category wins.
    #[serde(with = "ordered_categories")]
    pub target_directories: Vec<TargetDirectory>,

    pub settings: Settings,
}

impl Config {
    /// Load and validate configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Syntax` for malformed documents, `ConfigError::MissingKey`
    /// when a required key is absent, and the validation errors described on
    /// [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        match ConfigFormat::from_path(path) {
            ConfigFormat::Json => Self::from_json_str(&content),
            ConfigFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let document: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?;

        let object = document.as_object().ok_or_else(|| {
            ConfigError::Invalid("top level of the document must be an object".to_string())
        })?;
        check_required_keys(|key| object.contains_key(key))?;

        let config: Config =
            serde_json::from_value(document).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.normalized().validated()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let document: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?;
        check_required_keys(|key| document.contains_key(key))?;

        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.normalized().validated()
    }

    /// Build the default configuration the setup wizard starts from.
    ///
    /// Each category's destination is `organized_root/<Category>`.
    pub fn template(source_directory: PathBuf, organized_root: &Path) -> Self {
        let target_directories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, extensions)| TargetDirectory {
                name: name.to_string(),
                path: organized_root.join(capitalize(name)),
                extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
            })
            .collect();

        Self {
            source_directory,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            target_directories,
            settings: Settings {
                create_subdirectories_by_date: true,
                ..Settings::default()
            },
        }
    }

    /// Write this configuration to `path`, as TOML for `.toml` files and
    /// pretty-printed JSON otherwise. Parent directories are created.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&TargetDirectory> {
        self.target_directories.iter().find(|t| t.name == name)
    }

    /// Lower-case extensions and make sure each starts with `.`.
    fn normalized(mut self) -> Self {
        for target in &mut self.target_directories {
            target.extensions = target
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect();
        }
        self
    }

    /// Check the semantic rules serde cannot express.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidPattern` for an exclude pattern that is not a glob
    /// * `ConfigError::InvalidDateFormat` for an empty or malformed `date_format`
    /// * `ConfigError::Invalid` for empty category names/paths/extensions or
    ///   `min_file_size > max_file_size`
    pub fn validate(&self) -> Result<(), ConfigError> {
        ExclusionFilter::new(&self.exclude_patterns)?;
        validate_date_format(&self.settings.date_format)?;

        if let Some(max) = self.settings.max_file_size
            && self.settings.min_file_size > max
        {
            return Err(ConfigError::Invalid(format!(
                "min_file_size ({}) is larger than max_file_size ({})",
                self.settings.min_file_size, max
            )));
        }

        for target in &self.target_directories {
            if target.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "category names must not be empty".to_string(),
                ));
            }
            if target.path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has an empty path",
                    target.name
                )));
            }
            if target.extensions.iter().any(|ext| ext == ".") {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' lists an empty extension",
                    target.name
                )));
            }
        }

        Ok(())
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

fn check_required_keys(has_key: impl Fn(&str) -> bool) -> Result<(), ConfigError> {
    for key in REQUIRED_KEYS {
        if !has_key(key) {
            return Err(ConfigError::MissingKey(key));
        }
    }
    Ok(())
}

/// Reject empty formats and strftime strings chrono cannot render.
pub fn validate_date_format(format: &str) -> Result<(), ConfigError> {
    if format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    {
        return Err(ConfigError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// (De)serializes the category mapping as a map while keeping document order.
mod ordered_categories {
    use super::TargetDirectory;
    use serde::de::{MapAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::path::PathBuf;

    #[derive(Serialize, Deserialize)]
    struct CategorySpec {
        path: PathBuf,
        #[serde(default)]
        extensions: Vec<String>,
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(
        targets: &Vec<TargetDirectory>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(targets.iter().map(|target| {
            (
                &target.name,
                CategorySpec {
                    path: target.path.clone(),
                    extensions: target.extensions.clone(),
                },
            )
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<TargetDirectory>, D::Error> {
        deserializer.deserialize_map(CategoriesVisitor)
    }

    struct CategoriesVisitor;

    impl<'de> Visitor<'de> for CategoriesVisitor {
        type Value = Vec<TargetDirectory>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of category name to { path, extensions }")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut targets: Vec<TargetDirectory> = Vec::new();
            while let Some((name, spec)) = map.next_entry::<String, CategorySpec>()? {
                let target = TargetDirectory {
                    name,
                    path: spec.path,
                    extensions: spec.extensions,
                };
                // A repeated name replaces the earlier definition in place.
                match targets.iter_mut().find(|t| t.name == target.name) {
                    Some(existing) => *existing = target,
                    None => targets.push(target),
                }
            }
            Ok(targets)
        }
    }
}
