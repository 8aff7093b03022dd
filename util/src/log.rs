//! Environment-variable-driven log sink.
//!
//! Each harness component names an environment variable; its value selects
//! where log lines go: `1` means stdout, `2` means stderr, anything else is
//! treated as a file path (any pre-existing file is replaced). When the
//! variable is unset, logging stays disabled.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Where log output is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogSink {
    /// Parses an environment variable value into a sink selection.
    pub fn parse(value: &str) -> LogSink {
        match value {
            "1" => LogSink::Stdout,
            "2" => LogSink::Stderr,
            path => LogSink::File(PathBuf::from(path)),
        }
    }
}

#[derive(Clone)]
enum SinkHandle {
    Stdout,
    Stderr,
    File(Arc<Mutex<File>>),
}

pub struct SinkWriter(SinkHandle);

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.0 {
            SinkHandle::Stdout => io::stdout().lock().write(buf),
            SinkHandle::Stderr => io::stderr().lock().write(buf),
            SinkHandle::File(f) => {
                let mut f = f.lock().unwrap_or_else(|p| p.into_inner());
                f.write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.0 {
            SinkHandle::Stdout => io::stdout().lock().flush(),
            SinkHandle::Stderr => io::stderr().lock().flush(),
            SinkHandle::File(f) => {
                let mut f = f.lock().unwrap_or_else(|p| p.into_inner());
                f.flush()
            }
        }
    }
}

#[derive(Clone)]
struct SinkMaker(SinkHandle);

impl<'a> MakeWriter<'a> for SinkMaker {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter(self.0.clone())
    }
}

/// Installs the global tracing subscriber according to the named environment
/// variable. Returns whether logging was enabled. A second call (or a
/// subscriber installed elsewhere, as in tests) leaves the existing one in
/// place.
pub fn init_from_env(env_var: &str, debug: bool) -> bool {
    let Ok(value) = std::env::var(env_var) else {
        return false;
    };
    let sink = LogSink::parse(&value);
    let (handle, ansi) = match &sink {
        LogSink::Stdout => (SinkHandle::Stdout, true),
        LogSink::Stderr => (SinkHandle::Stderr, true),
        LogSink::File(path) => {
            if path.exists() {
                if let Err(err) = std::fs::remove_file(path) {
                    eprintln!(
                        "gurthang: failed to delete old log file {}: {err}",
                        path.display()
                    );
                    return false;
                }
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => (SinkHandle::File(Arc::new(Mutex::new(f))), false),
                Err(err) => {
                    eprintln!(
                        "gurthang: failed to open log file {}: {err}",
                        path.display()
                    );
                    return false;
                }
            }
        }
    };

    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(SinkMaker(handle))
        .try_init()
        .ok();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_parse_selects_streams_and_files() {
        assert_eq!(LogSink::parse("1"), LogSink::Stdout);
        assert_eq!(LogSink::parse("2"), LogSink::Stderr);
        assert_eq!(
            LogSink::parse("/tmp/out.log"),
            LogSink::File(PathBuf::from("/tmp/out.log"))
        );
        // multi-character numeric values are file paths, not stream selectors
        assert_eq!(LogSink::parse("12"), LogSink::File(PathBuf::from("12")));
    }
}
