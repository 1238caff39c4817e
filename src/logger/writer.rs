//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr,
//! filtered by a minimum level.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Parse a configured level name, unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(File),
}

/// Thread-safe log writer
pub struct LogWriter {
    max_level: Level,
    /// Info/debug target
    info: Mutex<LogTarget>,
    /// Warning/error target
    error: Mutex<LogTarget>,
}

impl LogWriter {
    fn new(max_level: Level, log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let info = match log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            max_level,
            info: Mutex::new(info),
            error: Mutex::new(error),
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    /// Write a message to the target matching its level
    pub fn write(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let target = match level {
            Level::Error | Level::Warn => &self.error,
            Level::Info | Level::Debug => &self.info,
        };
        // A poisoned lock only means another thread panicked mid-write
        let mut guard = target.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        write_to_target(&mut guard, message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &mut LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            let _ = writeln!(file, "{message}");
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(max_level: Level, log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(max_level, log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has been called
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("error"), Level::Error);
        assert_eq!(Level::parse("WARN"), Level::Warn);
        assert_eq!(Level::parse(" debug "), Level::Debug);
        assert_eq!(Level::parse("verbose"), Level::Info);
    }

    #[test]
    fn test_level_filter() {
        let writer = LogWriter::new(Level::Warn, None, None).unwrap();
        assert!(writer.enabled(Level::Error));
        assert!(writer.enabled(Level::Warn));
        assert!(!writer.enabled(Level::Info));
        assert!(!writer.enabled(Level::Debug));
    }

    #[test]
    fn test_file_targets() {
        let dir = TempDir::new().unwrap();
        let info_path = dir.path().join("logs/info.log");
        let error_path = dir.path().join("logs/error.log");

        let writer = LogWriter::new(
            Level::Info,
            info_path.to_str(),
            error_path.to_str(),
        )
        .unwrap();
        writer.write(Level::Info, "listening");
        writer.write(Level::Debug, "hidden");
        writer.write(Level::Error, "boom");

        let info = std::fs::read_to_string(&info_path).unwrap();
        let error = std::fs::read_to_string(&error_path).unwrap();
        assert_eq!(info, "listening\n");
        assert_eq!(error, "boom\n");
    }
}
