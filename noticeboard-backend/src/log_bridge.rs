/// Logger setup: env_logger to stderr, every record also appended to
/// ~/.config/noticeboard/logs/backend.log.
use env_logger::{Logger, Target};
use log::{Log, Metadata, Record, SetLoggerError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

struct BackendLogFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl BackendLogFile {
    fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("noticeboard")
            .join("logs")
            .join("backend.log");
        let file = Self::open(&path).ok();
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    fn open(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn append_line(&self, line: &str) {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if guard.is_none() {
            match Self::open(&self.path) {
                Ok(file) => *guard = Some(file),
                Err(_) => return,
            }
        }
        if let Some(file) = guard.as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.write_all(b"\n");
            let _ = file.flush();
        }
    }
}

static LOG_FILE: LazyLock<BackendLogFile> = LazyLock::new(BackendLogFile::new);

fn timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn format_log_line(timestamp_ms: u64, level: &str, target: &str, message: &str) -> String {
    format!(
        "{} [{}] [{}] {}",
        timestamp_ms,
        level.to_uppercase(),
        target,
        message.replace('\n', "\\n")
    )
}

struct TeeLogger {
    inner: Logger,
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.inner.log(record);
        LOG_FILE.append_line(&format_log_line(
            timestamp_ms(),
            record.level().as_str(),
            record.target(),
            &record.args().to_string(),
        ));
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the logger. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<(), SetLoggerError> {
    let _ = &*LOG_FILE;
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.target(Target::Stderr);
    let logger = Box::leak(Box::new(TeeLogger {
        inner: builder.build(),
    }));
    log::set_logger(logger)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

pub fn log_file_path() -> String {
    LOG_FILE.path.display().to_string()
}

/// Last resort when the logger itself could not be installed.
pub fn write_fallback_line(message: &str) {
    let line = format_log_line(timestamp_ms(), "error", "noticeboard.log_bridge", message);
    eprintln!("{}", line);
    LOG_FILE.append_line(&line);
}
