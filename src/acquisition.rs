//! Acquisition loop
//!
//! Drives a fixed number of sampling cycles over an ordered set of
//! sensors. For every sensor in a cycle: read, smooth, detect, and hand
//! any alert to the sink. Everything runs on the calling thread.
//!
//! A failing sink is logged and counted; it never stops the run and never
//! touches sensor state.

use std::collections::HashSet;
use std::fmt;

use crate::config::DaqConfig;
use crate::detector::{Alert, FaultDetector};
use crate::error::{ConfigError, Result};
use crate::filter::History;
use crate::sensor::{NoiseSource, Sensor, SensorId};
use crate::sink::AlertSink;

/// Level for raised alerts; below the binary's default `warn` filter.
pub const ALERT_LOG_LEVEL: log::Level = log::Level::Info;

/// Observation of one sensor in one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReport {
    pub sensor_id: SensorId,
    /// Kind label, e.g. "Temperature"
    pub label: String,
    pub raw: f64,
    pub smoothed: f64,
    pub alert: Option<Alert>,
}

/// Everything observed during one cycle, in sensor order
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: usize,
    pub readings: Vec<SensorReport>,
}

impl CycleReport {
    /// Alerts raised in this cycle
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.readings.iter().filter_map(|r| r.alert.as_ref())
    }
}

/// Run totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionStats {
    pub cycles: usize,
    pub samples: u64,
    pub alerts: u64,
    /// Alerts the sink failed to persist
    pub sink_failures: u64,
}

/// Owns the sensors, the detector and the alert sink
pub struct Acquisition<S: AlertSink> {
    sensors: Vec<Sensor>,
    ids: HashSet<SensorId>,
    detector: FaultDetector,
    sink: S,
    stats: AcquisitionStats,
}

impl<S: AlertSink + fmt::Debug> fmt::Debug for Acquisition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acquisition")
            .field("sensors", &self.sensors)
            .field("detector", &self.detector)
            .field("sink", &self.sink)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<S: AlertSink> Acquisition<S> {
    pub fn new(detector: FaultDetector, sink: S) -> Self {
        Self {
            sensors: Vec::new(),
            ids: HashSet::new(),
            detector,
            sink,
            stats: AcquisitionStats::default(),
        }
    }

    /// Build sensors and rules from a validated configuration.
    pub fn from_config(config: &DaqConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let capacity = config.capacity()?;

        let mut acquisition = Self::new(config.detector(), sink);
        for (index, sensor) in config.sensors.iter().enumerate() {
            let source = match config.sensor_seed(index) {
                Some(seed) => NoiseSource::seeded(sensor.profile.clone(), seed),
                None => NoiseSource::new(sensor.profile.clone()),
            };
            acquisition.add_sensor(Sensor::new(
                sensor.id,
                Box::new(source),
                History::new(capacity),
            ))?;
        }

        log::info!(
            "Acquisition ready: {} sensors, {} rules, window {}",
            acquisition.sensors.len(),
            acquisition.detector.rule_count(),
            capacity
        );
        Ok(acquisition)
    }

    /// Append a sensor; it is sampled after those already present.
    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        if !self.ids.insert(sensor.id()) {
            return Err(ConfigError::DuplicateSensor(sensor.id().0).into());
        }
        log::debug!("Registered sensor {} [{}]", sensor.id(), sensor.kind());
        self.sensors.push(sensor);
        Ok(())
    }

    /// Sample every sensor once.
    pub fn run_cycle(&mut self) -> CycleReport {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;
        let mut readings = Vec::with_capacity(self.sensors.len());

        for sensor in &mut self.sensors {
            let reading = sensor.sample();
            self.stats.samples += 1;
            log::trace!(
                "Cycle {} sensor {}: raw {:.1} smoothed {:.3}",
                cycle,
                reading.sensor_id,
                reading.raw,
                reading.smoothed
            );

            let alert = self
                .detector
                .detect(&reading.kind, reading.smoothed, reading.sensor_id);

            if let Some(alert) = &alert {
                self.stats.alerts += 1;
                log::log!(
                    ALERT_LOG_LEVEL,
                    "{} (smoothed {:.2})",
                    alert.message,
                    alert.value
                );
                if let Err(e) = self.sink.record(alert) {
                    self.stats.sink_failures += 1;
                    log::warn!("Alert not persisted: {}", e);
                }
            }

            readings.push(SensorReport {
                sensor_id: reading.sensor_id,
                label: reading.kind.to_string(),
                raw: reading.raw,
                smoothed: reading.smoothed,
                alert,
            });
        }

        CycleReport { cycle, readings }
    }

    /// Run `cycles` cycles, passing each report to `observer`.
    pub fn run<F>(&mut self, cycles: usize, mut observer: F) -> AcquisitionStats
    where
        F: FnMut(&CycleReport),
    {
        for _ in 0..cycles {
            let report = self.run_cycle();
            observer(&report);
        }
        log::info!(
            "Acquisition finished: {} cycles, {} alerts",
            self.stats.cycles,
            self.stats.alerts
        );
        self.stats
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id() == id)
    }

    pub fn detector(&self) -> &FaultDetector {
        &self.detector
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> AcquisitionStats {
        self.stats
    }

    /// Release the sink, e.g. to inspect recorded alerts.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
