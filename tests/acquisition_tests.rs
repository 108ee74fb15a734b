// DAQ - Integration Tests
//
// End-to-end behaviour of the acquisition pipeline:
// 1. Smoothing window properties
// 2. Fault detection scenarios
// 3. Alert log output

use std::num::NonZeroUsize;

use approx::assert_relative_eq;
use daq::{
    Acquisition, DaqConfig, FaultDetector, FileAlertSink, History, MemoryAlertSink, ReplaySource,
    Sensor, SensorId, SensorKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn replay_sensor(id: u32, kind: SensorKind, readings: &[f64]) -> Sensor {
    Sensor::new(
        SensorId(id),
        Box::new(ReplaySource::new(kind, readings.to_vec()).unwrap()),
        History::default(),
    )
}

// ============================================================================
// Smoothing window
// ============================================================================

#[test]
fn test_window_length_and_mean_for_random_sequences() {
    let mut rng = StdRng::seed_from_u64(2024);

    for capacity in 1..=8 {
        let mut history = History::new(NonZeroUsize::new(capacity).unwrap());
        let mut fed = Vec::new();

        for n in 1..=40 {
            let raw: f64 = rng.gen_range(-50.0..150.0);
            fed.push(raw);
            let smoothed = history.push(raw);

            assert_eq!(history.len(), n.min(capacity));

            let window = &fed[fed.len().saturating_sub(capacity)..];
            let expected = window.iter().sum::<f64>() / window.len() as f64;
            assert_relative_eq!(smoothed, expected, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_evicted_reading_never_counts() {
    let mut history = History::default();
    history.push(1_000_000.0);
    for _ in 0..5 {
        history.push(1.0);
    }
    assert_relative_eq!(history.mean().unwrap(), 1.0);
}

// ============================================================================
// Fault detection scenarios
// ============================================================================

#[test]
fn test_overheat_scenario() {
    let mut acq = Acquisition::new(FaultDetector::default(), MemoryAlertSink::new());
    acq.add_sensor(replay_sensor(
        101,
        SensorKind::TEMPERATURE,
        &[90.0, 92.0, 94.0, 96.0, 98.0, 100.0],
    ))
    .unwrap();

    let mut smoothed = Vec::new();
    acq.run(5, |report| smoothed.push(report.readings[0].smoothed));

    assert_eq!(smoothed, vec![90.0, 91.0, 92.0, 93.0, 94.0]);
    assert!(acq.sink().is_empty());

    let report = acq.run_cycle();
    assert_eq!(report.cycle, 6);
    assert_relative_eq!(report.readings[0].smoothed, 96.0);

    let alerts: Vec<_> = report.alerts().collect();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "OVERHEAT DETECTED: Sensor 101");
    assert_eq!(acq.sink().len(), 1);
}

#[test]
fn test_pressure_beside_hot_temperature() {
    let mut acq = Acquisition::new(FaultDetector::default(), MemoryAlertSink::new());
    acq.add_sensor(replay_sensor(101, SensorKind::TEMPERATURE, &[99.0]))
        .unwrap();
    acq.add_sensor(replay_sensor(102, SensorKind::PRESSURE, &[1000.0]))
        .unwrap();

    let stats = acq.run(5, |report| {
        assert_eq!(report.readings.len(), 2);
        assert!(report.readings[1].alert.is_none());
    });

    assert_eq!(stats.samples, 10);
    assert_eq!(stats.alerts, 5);
    let sink = acq.into_sink();
    assert!(sink.alerts().iter().all(|a| a.sensor_id == SensorId(101)));
}

#[test]
fn test_alert_clears_when_window_cools() {
    let mut acq = Acquisition::new(FaultDetector::default(), MemoryAlertSink::new());
    acq.add_sensor(replay_sensor(
        7,
        SensorKind::TEMPERATURE,
        &[99.0, 99.0, 80.0, 80.0, 80.0],
    ))
    .unwrap();

    let fired: Vec<bool> = (0..5)
        .map(|_| acq.run_cycle().alerts().next().is_some())
        .collect();

    // 99, 99, 92.67, 89.5, 87.6
    assert_eq!(fired, vec![true, true, false, false, false]);
}

#[test]
fn test_default_plant_smoothed_values_in_range() {
    let config = DaqConfig::default().with_seed(11).with_cycles(200);
    let mut acq = Acquisition::from_config(&config, MemoryAlertSink::new()).unwrap();

    acq.run(config.cycles, |report| {
        let temp = &report.readings[0];
        let pressure = &report.readings[1];
        assert_eq!(temp.label, "Temperature");
        assert!((80.0..100.0).contains(&temp.smoothed));
        assert!((50.0..60.0).contains(&pressure.smoothed));
        assert_eq!(temp.alert.is_some(), temp.smoothed > 95.0);
    });
}

// ============================================================================
// Alert log output
// ============================================================================

#[test]
fn test_alert_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daq_log.txt");

    let mut acq = Acquisition::new(FaultDetector::default(), FileAlertSink::new(path.clone()));
    acq.add_sensor(replay_sensor(101, SensorKind::TEMPERATURE, &[97.0, 90.0]))
        .unwrap();

    // 97, 93.5, 94.67, 93.5, 94.2
    let stats = acq.run(5, |_| {});
    assert_eq!(stats.alerts, 1);
    assert_eq!(stats.sink_failures, 0);

    let log = std::fs::read_to_string(&path).unwrap();
    assert_eq!(log, "[LOG] OVERHEAT DETECTED: Sensor 101\n");
}

#[test]
fn test_unwritable_log_keeps_sampling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("daq_log.txt");

    let mut acq = Acquisition::new(FaultDetector::default(), FileAlertSink::new(path));
    acq.add_sensor(replay_sensor(101, SensorKind::TEMPERATURE, &[99.0]))
        .unwrap();

    let stats = acq.run(3, |_| {});
    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.sink_failures, 3);
    assert_eq!(acq.sensor(SensorId(101)).unwrap().history().len(), 3);
}
