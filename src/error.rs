//! Error types for DAQ
//!
//! Sampling, filtering and detection cannot fail. Errors only arise while
//! building a configuration or when an alert sink cannot persist an alert.

use thiserror::Error;

/// Result type alias for DAQ operations
pub type Result<T> = std::result::Result<T, DaqError>;

/// Main error type for DAQ operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DaqError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Alert sink error
    #[error("Alert sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Errors while loading or validating a configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Configuration text is not valid JSON for `DaqConfig`
    #[error("Invalid configuration: {0}")]
    Parse(String),

    /// History capacity must hold at least one reading
    #[error("History capacity must be at least 1")]
    ZeroCapacity,

    /// Two sensors share the same identifier
    #[error("Duplicate sensor ID: {0}")]
    DuplicateSensor(u32),

    /// Noise span is negative, NaN, infinite or too wide to quantize
    #[error("Invalid noise span {span} for sensor {sensor_id}")]
    InvalidNoiseSpan { sensor_id: u32, span: f64 },

    /// Threshold is NaN or infinite
    #[error("Invalid threshold {threshold} for {kind}")]
    InvalidThreshold { kind: String, threshold: f64 },

    /// A replay source needs at least one recorded reading
    #[error("Replay source for {0} has no readings")]
    EmptyReplay(String),
}

/// Errors raised by alert sinks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// Alert log could not be opened or appended to
    #[error("Cannot write alert log {path}: {reason}")]
    Write { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DaqError::Sink(SinkError::Write {
            path: "daq_log.txt".to_string(),
            reason: "permission denied".to_string(),
        });
        let msg = format!("{}", err);
        assert!(msg.contains("daq_log.txt"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::DuplicateSensor(101);
        let daq_err: DaqError = config_err.into();
        assert!(matches!(daq_err, DaqError::Config(_)));
        assert!(daq_err.to_string().contains("101"));
    }
}
