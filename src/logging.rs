//! Process-wide logging: a size-capped rotating log file plus a console stream,
//! each with its own verbosity threshold.

use crate::config::LogConfig;
use crate::errors::{AppError, AppResult};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Append-only log file that rolls over once it would reach `max_bytes`.
///
/// Rollover shifts `file.N-1` to `file.N` down to `file` → `file.1`, keeping at
/// most `backup_count` old files, then starts a fresh file. With a zero
/// `max_bytes` the file never rolls over.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    size: u64,
}

impl RotatingFileWriter {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file,
            size,
        })
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rollover(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.backup_count > 0 {
            for n in (1..self.backup_count).rev() {
                let src = self.backup_path(n);
                if src.exists() {
                    fs::rename(&src, self.backup_path(n + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0 && self.size > 0 && self.size + buf.len() as u64 >= self.max_bytes {
            self.rollover()?;
        }
        self.file.write_all(buf)?;
        self.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Installs the global subscriber. Later calls are no-ops.
///
/// The file layer writes plain text (no ANSI colours) through a
/// [`RotatingFileWriter`]; the console layer writes compact lines to stderr.
/// Thresholds are `EnvFilter` directives taken from `config`.
///
/// # Errors
///
/// `InvalidConfig` for an unparsable directive, `Io` if the log file cannot be
/// opened.
pub fn init_logging(config: &LogConfig) -> AppResult<()> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let file_filter = parse_filter(&config.file_level)?;
    let console_filter = parse_filter(&config.console_level)?;
    let writer = RotatingFileWriter::open(config.log_path(), config.max_bytes, config.backup_count)?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(writer))
        .with_filter(file_filter);

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| AppError::InvalidConfig(format!("Failed to install logger: {e}")))?;

    let _ = INITIALIZED.set(());
    Ok(())
}

fn parse_filter(directive: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| AppError::InvalidConfig(format!("Invalid log level '{directive}': {e}")))
}
