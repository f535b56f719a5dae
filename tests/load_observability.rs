use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use table_loader::LoadError;
use table_loader::ingestion::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadOptions, LoadSeverity,
    LoadStats, TableFormat, TableStats, load_from_path,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<LoadStats>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, _ctx: &LoadContext, stats: &LoadStats) {
        self.successes.lock().unwrap().push(stats.clone());
    }

    fn on_failure(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &LoadError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &LoadError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn tmp_log(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("table-loader-{name}-{nanos}.log"))
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        format: Some(TableFormat::Csv),
        observer: Some(obs.clone()),
        alert_at_or_above: LoadSeverity::Critical,
    };

    // Missing file -> Io error -> Critical
    let _ = load_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![LoadSeverity::Critical]
    );
    assert_eq!(
        obs.alerts.lock().unwrap().clone(),
        vec![LoadSeverity::Critical]
    );
}

#[test]
fn observer_receives_failure_without_alert_for_parse_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    // Ragged row -> Error severity (not Critical) -> no alert
    let _ = load_from_path("tests/fixtures/ragged.csv", &opts).unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![LoadSeverity::Error]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn unsupported_format_is_not_reported_to_observers() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: LoadSeverity::Error,
        ..Default::default()
    };

    // No format means no load context.
    let _ = load_from_path("report.pdf", &opts).unwrap_err();
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    load_from_path("tests/fixtures/people.csv", &opts).unwrap();
    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![LoadStats {
            tables: vec![TableStats {
                name: "File".to_string(),
                rows: 2,
                columns: 4,
            }],
        }]
    );
    assert_eq!(successes[0].table_count(), 1);
    assert_eq!(successes[0].to_string(), "File(2x4)");
}

#[test]
fn composite_fans_out_and_file_observer_appends() {
    let recording = Arc::new(RecordingObserver::default());
    let log_path = tmp_log("observer");
    let observers: Vec<Arc<dyn LoadObserver>> =
        vec![recording.clone(), Arc::new(FileObserver::new(&log_path))];
    let composite = CompositeObserver::new(observers);
    let opts = LoadOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    load_from_path("tests/fixtures/people.csv", &opts).unwrap();
    let _ = load_from_path("tests/fixtures/ragged.csv", &opts).unwrap_err();

    assert_eq!(recording.successes.lock().unwrap().len(), 1);
    assert_eq!(recording.failures.lock().unwrap().len(), 1);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ok format=Csv"), "{}", lines[0]);
    assert!(lines[0].contains("tables=File(2x4) rows=2"), "{}", lines[0]);
    assert!(lines[1].contains("fail severity=Error"));

    let _ = std::fs::remove_file(&log_path);
}
