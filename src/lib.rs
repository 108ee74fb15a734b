//! # DAQ - Industrial data acquisition
//!
//! Simulates a small set of industrial sensors, smooths their readings with
//! a moving average, and raises an alert when a smoothed value crosses a
//! safety threshold.
//!
//! ## Quick Start
//!
//! ```rust
//! use daq::{Acquisition, DaqConfig, MemoryAlertSink};
//!
//! let config = DaqConfig::new().with_seed(42);
//! let mut acquisition = Acquisition::from_config(&config, MemoryAlertSink::new()).unwrap();
//!
//! let stats = acquisition.run(config.cycles, |report| {
//!     for r in &report.readings {
//!         println!("Sensor {} [{}] Filtered Output: {}", r.sensor_id, r.label, r.smoothed);
//!     }
//! });
//! assert_eq!(stats.cycles, 5);
//! ```
//!
//! ## Modules
//!
//! - [`sensor`]: Sensor identity, kinds and raw reading sources
//! - [`filter`]: Bounded history with moving-average smoothing
//! - [`detector`]: Threshold fault rules and alerts
//! - [`sink`]: Alert destinations (append-only log file, memory)
//! - [`acquisition`]: Cycle loop over the sensor set
//! - [`config`]: Run configuration, JSON loading

// Modules
pub mod acquisition;
pub mod config;
pub mod detector;
pub mod error;
pub mod filter;
pub mod sensor;
pub mod sink;

// Re-exports for convenient access
pub use acquisition::{Acquisition, AcquisitionStats, CycleReport, SensorReport};
pub use config::{DaqConfig, RuleConfig, SensorConfig, DEFAULT_CYCLES};
pub use detector::{Alert, FaultDetector, FaultRule};
pub use error::{ConfigError, DaqError, Result, SinkError};
pub use filter::{History, DEFAULT_HISTORY_CAPACITY};
pub use sensor::{
    NoiseProfile, NoiseSource, RawSource, Reading, ReplaySource, Sensor, SensorId, SensorKind,
};
pub use sink::{AlertSink, FileAlertSink, MemoryAlertSink, NullAlertSink, DEFAULT_LOG_PATH};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
