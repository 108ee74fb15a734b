//! Threshold fault detection on smoothed values.
//!
//! Rules are looked up by [`SensorKind`]. A kind without a rule never
//! faults. Detection holds no state: an alert is produced on every
//! inspection where the condition holds, with no debouncing.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sensor::{SensorId, SensorKind};

/// Threshold rule for one sensor kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRule {
    /// Values strictly above this are faults.
    pub threshold: f64,
    /// Leading phrase of the alert message.
    pub phrase: String,
}

impl FaultRule {
    pub fn new(threshold: f64, phrase: impl Into<String>) -> Self {
        Self {
            threshold,
            phrase: phrase.into(),
        }
    }

    /// Temperature overheat above 95.0
    pub fn overheat() -> Self {
        Self::new(95.0, "OVERHEAT DETECTED")
    }

    /// Strict greater-than: a value equal to the threshold is not a fault.
    pub fn is_fault(&self, value: f64) -> bool {
        value > self.threshold
    }

    fn message(&self, sensor_id: SensorId) -> String {
        format!("{}: Sensor {}", self.phrase, sensor_id)
    }
}

/// A raised fault, handed to the alert sink and returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub sensor_id: SensorId,
    pub kind: SensorKind,
    /// Smoothed value that tripped the rule.
    pub value: f64,
    pub message: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Rule table keyed by sensor kind
#[derive(Debug, Clone)]
pub struct FaultDetector {
    rules: HashMap<SensorKind, FaultRule>,
}

impl FaultDetector {
    /// Detector with no rules (never faults)
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule for a kind
    pub fn with_rule(mut self, kind: SensorKind, rule: FaultRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    pub fn set_rule(&mut self, kind: SensorKind, rule: FaultRule) -> Option<FaultRule> {
        self.rules.insert(kind, rule)
    }

    pub fn rule_for(&self, kind: &SensorKind) -> Option<&FaultRule> {
        self.rules.get(kind)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Inspect one smoothed value.
    pub fn detect(&self, kind: &SensorKind, value: f64, sensor_id: SensorId) -> Option<Alert> {
        let rule = self.rules.get(kind)?;
        if !rule.is_fault(value) {
            return None;
        }

        Some(Alert {
            sensor_id,
            kind: kind.clone(),
            value,
            message: rule.message(sensor_id),
        })
    }
}

impl Default for FaultDetector {
    fn default() -> Self {
        Self::empty().with_rule(SensorKind::TEMPERATURE, FaultRule::overheat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let detector = FaultDetector::default();
        assert!(detector
            .detect(&SensorKind::TEMPERATURE, 95.0, SensorId(1))
            .is_none());

        let alert = detector
            .detect(&SensorKind::TEMPERATURE, 95.0001, SensorId(1))
            .unwrap();
        assert!(alert.message.contains('1'));
    }

    #[test]
    fn test_overheat_message() {
        let detector = FaultDetector::default();
        let alert = detector
            .detect(&SensorKind::TEMPERATURE, 96.0, SensorId(101))
            .unwrap();

        assert_eq!(alert.message, "OVERHEAT DETECTED: Sensor 101");
        assert_eq!(alert.to_string(), alert.message);
        assert_eq!(alert.sensor_id, SensorId(101));
        assert_eq!(alert.value, 96.0);
    }

    #[test]
    fn test_kind_without_rule_never_faults() {
        let detector = FaultDetector::default();
        assert!(detector
            .detect(&SensorKind::PRESSURE, 1000.0, SensorId(102))
            .is_none());
        assert!(detector.rule_for(&SensorKind::PRESSURE).is_none());
    }

    #[test]
    fn test_repeated_inspections_fire_each_time() {
        let detector = FaultDetector::default();
        let fired = (0..3)
            .filter_map(|_| detector.detect(&SensorKind::TEMPERATURE, 99.0, SensorId(5)))
            .count();
        assert_eq!(fired, 3);
    }

    #[test]
    fn test_custom_rule() {
        let mut detector =
            FaultDetector::default().with_rule(SensorKind::PRESSURE, FaultRule::new(58.0, "OVERPRESSURE"));
        assert_eq!(detector.rule_count(), 2);

        let alert = detector
            .detect(&SensorKind::PRESSURE, 58.5, SensorId(102))
            .unwrap();
        assert_eq!(alert.message, "OVERPRESSURE: Sensor 102");

        let old = detector.set_rule(SensorKind::PRESSURE, FaultRule::new(60.0, "OVERPRESSURE"));
        assert_eq!(old.map(|r| r.threshold), Some(58.0));
        assert!(detector
            .detect(&SensorKind::PRESSURE, 58.5, SensorId(102))
            .is_none());
    }

    #[test]
    fn test_empty_detector() {
        let detector = FaultDetector::empty();
        assert!(detector
            .detect(&SensorKind::TEMPERATURE, 1e9, SensorId(1))
            .is_none());
    }
}
