use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::{ExistingTablePolicy, InputFormat, ParseMode};
use crate::parser::find_input_files;
use crate::transform::builtins::{builtin, BUILTIN_NAMES};
use crate::validator::ValidationRules;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Logging sinks and thresholds.
///
/// Every field has a default, so an absent `[logging]` section yields a
/// `logs/transformer.log` file capped at 5 MiB with 5 backups, capturing `info`
/// and above, and a console capturing `debug` and above.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Directory holding the log file and its rotated backups
    pub dir: PathBuf,
    /// Log file name inside `dir`
    pub file: String,
    /// Size at which the file rolls over; 0 disables rotation
    pub max_bytes: u64,
    /// Number of rotated files kept
    pub backup_count: usize,
    /// `EnvFilter` directive for the file sink
    pub file_level: String,
    /// `EnvFilter` directive for the console sink
    pub console_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(LOG_DIR),
            file: LOG_FILE.to_string(),
            max_bytes: LOG_MAX_BYTES,
            backup_count: LOG_BACKUP_COUNT,
            file_level: FILE_LOG_LEVEL.to_string(),
            console_level: CONSOLE_LOG_LEVEL.to_string(),
        }
    }
}

impl LogConfig {
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

/// Where input comes from and how parse failures are treated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub format: InputFormat,
    /// Explicit input files, loaded in order
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Directory scanned recursively for files of `format`
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Element name of one XML record (required for XML)
    #[serde(default)]
    pub record_tag: Option<String>,
    /// Skip unreadable files instead of failing (defaults to `true`)
    #[serde(default = "default_safe")]
    pub safe: bool,
}

impl InputConfig {
    pub fn mode(&self) -> ParseMode {
        if self.safe {
            ParseMode::Safe
        } else {
            ParseMode::Strict
        }
    }

    /// Explicit paths followed by the files found under `dir`.
    pub fn resolve_paths(&self) -> AppResult<Vec<PathBuf>> {
        let mut paths = self.paths.clone();
        if let Some(dir) = &self.dir {
            paths.extend(find_input_files(dir, self.format.extensions())?);
        }
        Ok(paths)
    }
}

fn default_safe() -> bool {
    true
}

/// Column renames and named per-column functions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    pub rename: HashMap<String, String>,
    /// Column → built-in function name (`int`, `float`, `str`, `upper`, `lower`, `trim`)
    pub functions: BTreeMap<String, String>,
}

/// Export destination, selected by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputConfig {
    Csv {
        path: PathBuf,
        #[serde(default)]
        index: bool,
    },
    Excel {
        path: PathBuf,
        #[serde(default)]
        index: bool,
    },
    Parquet {
        path: PathBuf,
    },
    Sql {
        database: PathBuf,
        table: String,
        #[serde(default)]
        if_exists: ExistingTablePolicy,
    },
}

impl OutputConfig {
    /// Human-readable destination used in logs.
    pub fn destination(&self) -> String {
        match self {
            Self::Csv { path, .. } | Self::Excel { path, .. } | Self::Parquet { path } => {
                path.display().to_string()
            }
            Self::Sql {
                database, table, ..
            } => format!("{}#{table}", database.display()),
        }
    }
}

/// A complete job loaded from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub validate: ValidationRules,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl JobConfig {
    /// Loads and validates a job from a TOML file.
    ///
    /// Unknown keys are rejected to catch typos.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` if the TOML is malformed
    /// or fails [`JobConfig::check`].
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: JobConfig = toml::from_str(contents)
            .map_err(|e| AppError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.check()?;
        Ok(config)
    }

    /// Cross-field checks serde cannot express.
    pub fn check(&self) -> AppResult<()> {
        if self.input.paths.is_empty() && self.input.dir.is_none() {
            return Err(AppError::InvalidConfig(
                "input needs at least one of `paths` or `dir`".into(),
            ));
        }

        if self.input.format == InputFormat::Xml
            && self
                .input
                .record_tag
                .as_deref()
                .map_or(true, |t| t.trim().is_empty())
        {
            return Err(AppError::InvalidConfig(
                "XML input requires a non-empty `record_tag`".into(),
            ));
        }

        for (column, name) in &self.transform.functions {
            if builtin(name).is_none() {
                return Err(AppError::InvalidConfig(format!(
                    "Unknown function '{name}' for column '{column}'. Available: {}",
                    BUILTIN_NAMES.join(", ")
                )));
            }
        }

        if let OutputConfig::Sql { table, .. } = &self.output {
            if table.trim().is_empty() {
                return Err(AppError::InvalidConfig("SQL output requires a table name".into()));
            }
        }

        for directive in [&self.logging.file_level, &self.logging.console_level] {
            tracing_subscriber::EnvFilter::try_new(directive).map_err(|e| {
                AppError::InvalidConfig(format!("Invalid log level '{directive}': {e}"))
            })?;
        }

        Ok(())
    }
}
