//! Log writer module
//!
//! Installs the global `tracing` subscriber. Informational and access events go
//! to stdout or the access log file; warnings and errors go to stderr or the
//! error log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Initialize the global subscriber
///
/// `level` is used when `RUST_LOG` is not set. Returns an error if a log file
/// cannot be opened or a subscriber is already installed.
pub fn init(
    level: &str,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level)).map_err(
            |e| io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid log level: {e}")),
        )?;

    let info_layer = tracing_subscriber::fmt::layer()
        .with_ansi(access_log_file.is_none())
        .with_writer(make_writer(access_log_file, Target::Stdout)?)
        .with_filter(filter_fn(|meta| *meta.level() > Level::WARN));

    let error_layer = tracing_subscriber::fmt::layer()
        .with_ansi(error_log_file.is_none())
        .with_writer(make_writer(error_log_file, Target::Stderr)?)
        .with_filter(filter_fn(|meta| *meta.level() <= Level::WARN));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(info_layer)
        .with(error_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))
}

/// Fallback when no file is configured
enum Target {
    Stdout,
    Stderr,
}

fn make_writer(path: Option<&str>, fallback: Target) -> io::Result<BoxMakeWriter> {
    Ok(match (path, fallback) {
        (Some(p), _) => BoxMakeWriter::new(Mutex::new(open_log_file(p)?)),
        (None, Target::Stdout) => BoxMakeWriter::new(io::stdout),
        (None, Target::Stderr) => BoxMakeWriter::new(io::stderr),
    })
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/access.log");
        let path_str = path.to_str().unwrap();

        let mut file = open_log_file(path_str).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);

        let mut file = open_log_file(path_str).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_make_writer_reports_unopenable_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let result = make_writer(dir.path().to_str(), Target::Stdout);
        assert!(result.is_err());
    }
}
