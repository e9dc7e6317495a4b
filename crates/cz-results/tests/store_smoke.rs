use cz_core::{Zone, ZoneMap};
use cz_results::*;

fn manifest(run_id: &str, started_at: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        facility: "Reference cold store".to_string(),
        started_at: started_at.to_string(),
        finished_at: started_at.to_string(),
        control_period_s: 0.5,
        cycles: 2,
        source: SourceKind::Synthetic { seed: Some(1) },
        stop_reason: StopReason::Interrupted,
        controller_version: "0.1.0".to_string(),
    }
}

fn snapshot(cycle: u64, fan_power_kw: f64) -> CycleSnapshot {
    CycleSnapshot {
        cycle,
        zones: ZoneMap::from_fn(|z| ZoneSnapshot {
            temperature: z.index() as f64,
            setpoint: 0.0,
            damper: 10.0,
        }),
        fan_power_kw,
        energy_savings_percent: 70,
    }
}

#[test]
fn save_and_load_run() {
    let temp_dir = std::env::temp_dir().join("cz_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    let manifest = manifest("test_run_123", "2026-02-25T12:00:00Z");
    let history = vec![snapshot(1, 2.01), snapshot(2, 2.02)];

    store.save_run(&manifest, &history).unwrap();
    assert!(store.has_run("test_run_123"));

    let loaded_manifest = store.load_manifest("test_run_123").unwrap();
    assert_eq!(loaded_manifest, manifest);

    let loaded = store.load_history("test_run_123").unwrap();
    assert_eq!(loaded, history);
    assert_eq!(loaded[1].zones[Zone::Packing].temperature, 2.0);
}

#[test]
fn list_runs_oldest_first_and_delete() {
    let temp_dir = std::env::temp_dir().join("cz_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    store
        .save_run(&manifest("late", "2026-02-25T14:00:00Z"), &[])
        .unwrap();
    store
        .save_run(&manifest("early", "2026-02-25T12:00:00Z"), &[])
        .unwrap();

    let runs = store.list_runs().unwrap();
    let ids: Vec<_> = runs.iter().map(|m| m.run_id.as_str()).collect();
    assert_eq!(ids, ["early", "late"]);

    store.delete_run("early").unwrap();
    assert!(!store.has_run("early"));
    assert_eq!(store.list_runs().unwrap().len(), 1);
}

#[test]
fn missing_run_is_reported() {
    let temp_dir = std::env::temp_dir().join("cz_results_test_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(matches!(
        store.load_history("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn live_feed_keeps_only_latest_snapshot() {
    let temp_dir = std::env::temp_dir().join("cz_results_test_live");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let feed = LiveFeed::new(temp_dir.join("live_data.json"));
    feed.publish(&snapshot(1, 2.0)).unwrap();
    feed.publish(&snapshot(2, 2.5)).unwrap();

    let latest = feed.read().unwrap();
    assert_eq!(latest.cycle, 2);
    assert_eq!(latest.fan_power_kw, 2.5);

    let raw = std::fs::read_to_string(feed.path()).unwrap();
    assert!(raw.contains(r#""zones":{"Freezer":{"temperature":0.0"#));
    assert!(raw.contains(r#""energy_savings_percent":70"#));
}
