//! Acquisition configuration.
//!
//! Defaults reproduce the stock plant: a temperature sensor (101) and a
//! pressure sensor (102), a five-reading window, five cycles, and an
//! overheat rule at 95.0.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detector::{FaultDetector, FaultRule};
use crate::error::ConfigError;
use crate::filter::DEFAULT_HISTORY_CAPACITY;
use crate::sensor::{NoiseProfile, SensorId, SensorKind};
use crate::sink::DEFAULT_LOG_PATH;

/// Default number of sampling cycles.
pub const DEFAULT_CYCLES: usize = 5;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaqConfig {
    /// Number of sampling cycles to run.
    pub cycles: usize,
    /// Readings kept per sensor for the moving average.
    pub history_capacity: usize,
    /// Alert log file.
    pub log_path: PathBuf,
    /// Random seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Sensors, sampled in this order every cycle.
    pub sensors: Vec<SensorConfig>,
    /// Fault rules by sensor kind.
    pub rules: Vec<RuleConfig>,
}

/// One simulated sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub id: SensorId,
    #[serde(flatten)]
    pub profile: NoiseProfile,
}

impl SensorConfig {
    pub fn new(id: u32, profile: NoiseProfile) -> Self {
        Self {
            id: SensorId(id),
            profile,
        }
    }
}

/// One fault rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub kind: SensorKind,
    #[serde(flatten)]
    pub rule: FaultRule,
}

impl Default for DaqConfig {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            seed: None,
            sensors: vec![
                SensorConfig::new(101, NoiseProfile::temperature()),
                SensorConfig::new(102, NoiseProfile::pressure()),
            ],
            rules: vec![RuleConfig {
                kind: SensorKind::TEMPERATURE,
                rule: FaultRule::overheat(),
            }],
        }
    }
}

impl DaqConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Set number of cycles.
    pub fn with_cycles(mut self, cycles: usize) -> Self {
        self.cycles = cycles;
        self
    }

    /// Set history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set alert log path.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the sensor list.
    pub fn with_sensors(mut self, sensors: Vec<SensorConfig>) -> Self {
        self.sensors = sensors;
        self
    }

    /// Add or replace the rule for a kind.
    pub fn with_rule(mut self, kind: SensorKind, rule: FaultRule) -> Self {
        self.rules.retain(|r| r.kind != kind);
        self.rules.push(RuleConfig { kind, rule });
        self
    }

    /// History capacity as a validated non-zero value.
    pub fn capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.history_capacity).ok_or(ConfigError::ZeroCapacity)
    }

    /// Build the fault detector from the rule list.
    pub fn detector(&self) -> FaultDetector {
        self.rules
            .iter()
            .fold(FaultDetector::empty(), |detector, r| {
                detector.with_rule(r.kind.clone(), r.rule.clone())
            })
    }

    /// Seed for the sensor at `index`, if the run is seeded.
    pub fn sensor_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }

    /// Check the configuration for values that cannot be simulated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity()?;

        let mut seen = HashSet::new();
        for sensor in &self.sensors {
            if !seen.insert(sensor.id) {
                return Err(ConfigError::DuplicateSensor(sensor.id.0));
            }
            if !sensor.profile.has_valid_span() {
                return Err(ConfigError::InvalidNoiseSpan {
                    sensor_id: sensor.id.0,
                    span: sensor.profile.noise_span,
                });
            }
        }

        for rule in &self.rules {
            if !rule.rule.threshold.is_finite() {
                return Err(ConfigError::InvalidThreshold {
                    kind: rule.kind.to_string(),
                    threshold: rule.rule.threshold,
                });
            }
        }

        Ok(())
    }
}
