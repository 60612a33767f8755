use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use sales_report::ingestion::{
    ingest_from_path, CompositeObserver, FileObserver, IngestionContext, IngestionFormat, IngestionObserver,
    IngestionOptions, IngestionSeverity, IngestionStats, LoadOptions,
};
use sales_report::types::DateFormat;
use sales_report::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_bad_data() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };

    // Invalid amount -> Error severity (not Critical) -> should not alert
    let _ = ingest_from_path("tests/fixtures/bad_amount.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_stats_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        load: LoadOptions::with_date_format(DateFormat::MonthFirst),
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let store = ingest_from_path("tests/fixtures/superstore_sample.csv", &opts).unwrap();

    let successes = obs.successes.lock().unwrap();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].records, 16);
    assert_eq!(successes[0].date_bounds, store.date_bounds());
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_to_file_observer() {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let log_path = std::env::temp_dir().join(format!("sales-report-ingest-{nanos}.log"));

    let recording = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        recording.clone(),
        Arc::new(FileObserver::new(&log_path)),
    ]);
    let opts = IngestionOptions {
        observer: Some(Arc::new(composite)),
        alert_at_or_above: IngestionSeverity::Error,
        ..Default::default()
    };

    let _ = ingest_from_path("tests/fixtures/bad_amount.csv", &opts).unwrap_err();

    assert_eq!(*recording.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("fail severity=Error"));
    assert!(log.contains("ALERT severity=Error"));
    let _ = std::fs::remove_file(log_path);
}
