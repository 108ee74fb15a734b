//! Alert sinks
//!
//! The acquisition loop hands every alert to an [`AlertSink`]. The file
//! sink opens, appends and closes the log for each alert; no handle is
//! kept between cycles.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::detector::Alert;
use crate::error::SinkError;

/// Default alert log file name.
pub const DEFAULT_LOG_PATH: &str = "daq_log.txt";

/// Destination for alerts
pub trait AlertSink {
    /// Persist one alert
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError>;
}

/// Append-only line log: one `[LOG] <message>` line per alert.
#[derive(Debug, Clone)]
pub struct FileAlertSink {
    path: PathBuf,
}

impl FileAlertSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format an alert as a log line (without the newline)
    pub fn format_line(alert: &Alert) -> String {
        format!("[LOG] {}", alert.message)
    }

    fn write_error(&self, err: std::io::Error) -> SinkError {
        SinkError::Write {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl Default for FileAlertSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl AlertSink for FileAlertSink {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;

        writeln!(file, "{}", Self::format_line(alert)).map_err(|e| self.write_error(e))?;
        log::debug!("Alert appended to {}", self.path.display());
        Ok(())
    }
}

/// Keeps alerts in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertSink {
    alerts: Vec<Alert>,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded alerts
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

impl AlertSink for MemoryAlertSink {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        self.alerts.push(alert.clone());
        Ok(())
    }
}

/// Discards alerts
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn record(&mut self, _alert: &Alert) -> Result<(), SinkError> {
        Ok(())
    }
}
