use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Lines kept for the in-app console.
const CONSOLE_CAPACITY: usize = 500;

/// Ring buffer of formatted log lines, shared with the console panel.
#[derive(Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() >= CONSOLE_CAPACITY {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// The most recent `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(n)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Splits whatever the formatter writes into lines for the buffer.
pub struct LineWriter {
    buffer: LogBuffer,
    current: Vec<u8>,
}

impl Write for LineWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        for &b in bytes {
            if b == b'\n' {
                let line = String::from_utf8_lossy(&self.current).into_owned();
                self.buffer.push(line);
                self.current.clear();
            } else {
                self.current.push(b);
            }
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        if !self.current.is_empty() {
            let line = String::from_utf8_lossy(&self.current).into_owned();
            self.buffer.push(line);
        }
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            buffer: self.clone(),
            current: Vec::new(),
        }
    }
}

/// Install the global subscriber. Output goes to `buffer` and, when given,
/// appended to `log_file`; never to the terminal the UI is drawing on.
pub fn init(buffer: LogBuffer, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };

    let writer = match file {
        Some(file) => BoxMakeWriter::new(buffer.and(Mutex::new(file))),
        None => BoxMakeWriter::new(buffer),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {e}"))
}
