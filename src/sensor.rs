//! Sensors and their raw reading sources
//!
//! A [`Sensor`] pairs an identity with a [`RawSource`] and its own
//! smoothing [`History`]. Sources are trait objects, so new sensor kinds
//! only need a new [`NoiseProfile`] or a new `RawSource` implementation.

use std::borrow::Cow;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::History;

/// Unique sensor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub u32);

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sensor kind tag (Temperature, Pressure, ...)
///
/// The set of kinds is open: anything can be tagged with
/// [`SensorKind::new`]. Fault rules are keyed by this tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorKind(Cow<'static, str>);

impl SensorKind {
    /// Temperature sensor, degrees Celsius
    pub const TEMPERATURE: SensorKind = SensorKind(Cow::Borrowed("Temperature"));

    /// Pressure sensor, PSI
    pub const PRESSURE: SensorKind = SensorKind(Cow::Borrowed("Pressure"));

    /// Create a kind from a label
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self(label.into())
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of one noisy scalar reading per call
pub trait RawSource {
    /// Produce the next raw reading
    fn read_raw(&mut self) -> f64;

    /// Kind of sensor this source simulates
    fn kind(&self) -> &SensorKind;
}

/// Value range of a simulated sensor: `[base, base + noise_span)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseProfile {
    pub kind: SensorKind,
    /// Lowest value the sensor reports.
    pub base: f64,
    /// Width of the noise band above `base`.
    pub noise_span: f64,
}

impl NoiseProfile {
    /// Noise steps per unit: readings are quantized to 0.1.
    pub const STEPS_PER_UNIT: f64 = 10.0;

    /// Largest step count whose every step is exactly representable as f64.
    pub const MAX_STEPS: u64 = 1 << 53;

    pub fn new(kind: SensorKind, base: f64, noise_span: f64) -> Self {
        Self {
            kind,
            base,
            noise_span,
        }
    }

    /// Temperature in `[80.0, 100.0)`
    pub fn temperature() -> Self {
        Self::new(SensorKind::TEMPERATURE, 80.0, 20.0)
    }

    /// Pressure in `[50.0, 60.0)`
    pub fn pressure() -> Self {
        Self::new(SensorKind::PRESSURE, 50.0, 10.0)
    }

    /// Number of distinct noise steps in the span.
    pub fn steps(&self) -> u64 {
        // `as` saturates: negative and NaN spans give zero steps.
        (self.noise_span * Self::STEPS_PER_UNIT).round() as u64
    }

    /// True when the span is finite, non-negative and within `MAX_STEPS`.
    pub fn has_valid_span(&self) -> bool {
        self.noise_span.is_finite()
            && self.noise_span >= 0.0
            && self.noise_span * Self::STEPS_PER_UNIT <= Self::MAX_STEPS as f64
    }
}

/// Uniform quantized noise over a [`NoiseProfile`]
#[derive(Debug, Clone)]
pub struct NoiseSource {
    profile: NoiseProfile,
    rng: StdRng,
}

impl NoiseSource {
    /// Create a source seeded from OS entropy
    pub fn new(profile: NoiseProfile) -> Self {
        Self {
            profile,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible source
    pub fn seeded(profile: NoiseProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn profile(&self) -> &NoiseProfile {
        &self.profile
    }
}

impl RawSource for NoiseSource {
    fn read_raw(&mut self) -> f64 {
        let steps = self.profile.steps();
        if steps == 0 {
            return self.profile.base;
        }
        let k = self.rng.gen_range(0..steps);
        self.profile.base + k as f64 / NoiseProfile::STEPS_PER_UNIT
    }

    fn kind(&self) -> &SensorKind {
        &self.profile.kind
    }
}

/// Replays a recorded sequence of readings, wrapping at the end
#[derive(Debug, Clone)]
pub struct ReplaySource {
    kind: SensorKind,
    readings: Vec<f64>,
    position: usize,
}

impl ReplaySource {
    pub fn new(kind: SensorKind, readings: Vec<f64>) -> Result<Self, ConfigError> {
        if readings.is_empty() {
            return Err(ConfigError::EmptyReplay(kind.to_string()));
        }
        Ok(Self {
            kind,
            readings,
            position: 0,
        })
    }

    /// Number of readings served so far
    pub fn position(&self) -> usize {
        self.position
    }
}

impl RawSource for ReplaySource {
    fn read_raw(&mut self) -> f64 {
        let value = self.readings[self.position % self.readings.len()];
        self.position += 1;
        value
    }

    fn kind(&self) -> &SensorKind {
        &self.kind
    }
}

/// One sampled value: raw reading and its smoothed counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor_id: SensorId,
    pub kind: SensorKind,
    pub raw: f64,
    pub smoothed: f64,
}

/// A sensor instance with its exclusively owned history
pub struct Sensor {
    id: SensorId,
    source: Box<dyn RawSource>,
    history: History,
}

impl Sensor {
    pub fn new(id: SensorId, source: Box<dyn RawSource>, history: History) -> Self {
        Self {
            id,
            source,
            history,
        }
    }

    /// Simulated temperature sensor with the default window
    pub fn temperature(id: u32) -> Self {
        Self::new(
            SensorId(id),
            Box::new(NoiseSource::new(NoiseProfile::temperature())),
            History::default(),
        )
    }

    /// Simulated pressure sensor with the default window
    pub fn pressure(id: u32) -> Self {
        Self::new(
            SensorId(id),
            Box::new(NoiseSource::new(NoiseProfile::pressure())),
            History::default(),
        )
    }

    /// Read one raw value and smooth it through this sensor's history.
    pub fn sample(&mut self) -> Reading {
        let raw = self.source.read_raw();
        let smoothed = self.history.push(raw);
        Reading {
            sensor_id: self.id,
            kind: self.source.kind().clone(),
            raw,
            smoothed,
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn kind(&self) -> &SensorKind {
        self.source.kind()
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("id", &self.id)
            .field("kind", self.source.kind())
            .field("history", &self.history)
            .finish()
    }
}
