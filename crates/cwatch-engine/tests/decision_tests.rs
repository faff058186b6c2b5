//! End-to-end decision engine tests with scripted collaborators.
//!
//! Each test drives `run_cycle_at` with explicit clocks, so confirmation
//! windows, cooldowns, and calendar gates are fully deterministic.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use cwatch_clients::{CameraClient, ClientError, ClientResult, IrrigationClient};
use cwatch_detect::{DetectError, DetectResult, Detector, RawOutput};
use cwatch_engine::{DecisionEngine, SettingsStore, WatcherConfig, ZoneOutcome};
use cwatch_models::{DeterrenceSettings, NormalizedRect, Snapshot, Zone};

struct StaticCamera {
    width: u32,
    height: u32,
}

#[async_trait]
impl CameraClient for StaticCamera {
    async fn get_snapshot(&self, _camera: &str) -> ClientResult<Snapshot> {
        Ok(Snapshot::new(Vec::new(), self.width, self.height))
    }
}

struct FailingCamera;

#[async_trait]
impl CameraClient for FailingCamera {
    async fn get_snapshot(&self, camera: &str) -> ClientResult<Snapshot> {
        Err(ClientError::unavailable(format!("camera {} offline", camera)))
    }
}

/// Returns the same candidate rows on every call.
struct ScriptedDetector {
    rows: Vec<[f32; 6]>,
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn infer(&self, _snapshot: &Snapshot) -> DetectResult<RawOutput> {
        Ok(RawOutput::from_rows(self.rows.clone()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct UnavailableDetector;

#[async_trait]
impl Detector for UnavailableDetector {
    async fn infer(&self, _snapshot: &Snapshot) -> DetectResult<RawOutput> {
        Err(DetectError::model_unavailable("connection refused"))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

struct RecordingIrrigation {
    calls: Mutex<Vec<(Vec<u32>, u32)>>,
    fail: bool,
}

impl RecordingIrrigation {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail,
        })
    }

    fn calls(&self) -> Vec<(Vec<u32>, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IrrigationClient for RecordingIrrigation {
    async fn activate(&self, targets: &[u32], duration_secs: u32) -> ClientResult<()> {
        self.calls.lock().unwrap().push((targets.to_vec(), duration_secs));
        if self.fail {
            Err(ClientError::request_failed("controller offline"))
        } else {
            Ok(())
        }
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
}

fn local(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn summer_noon() -> NaiveDateTime {
    local(6, 15, 12)
}

/// Settings with wide-open gates; tests narrow them as needed.
fn test_settings(required: usize, cooldown_secs: u64) -> DeterrenceSettings {
    let mut s = DeterrenceSettings::default();
    s.confidence_threshold = 0.5;
    s.required_detections = required;
    s.confirmation_window_seconds = 10;
    s.season_start = "01-01".parse().unwrap();
    s.season_end = "12-31".parse().unwrap();
    s.active_hours_enabled = false;
    s.actuation_duration_seconds = 10;
    s.zone_cooldown_seconds = cooldown_secs;
    s
}

fn zone(name: &str, rect: NormalizedRect, targets: Vec<u32>) -> Zone {
    Zone {
        name: name.to_string(),
        camera_id: "north".to_string(),
        detection_area: rect,
        sprinkler_targets: targets,
    }
}

fn full_frame_zone() -> Zone {
    zone("garden", NormalizedRect::new(0.0, 0.0, 1.0, 1.0), vec![1, 2])
}

/// One 0.9-confidence deer box; its center maps inside any full-frame zone.
fn one_detection() -> Vec<[f32; 6]> {
    vec![[100.0, 100.0, 200.0, 200.0, 0.9, 0.0]]
}

struct Harness {
    engine: DecisionEngine,
    settings: SettingsStore,
    irrigation: Arc<RecordingIrrigation>,
}

fn harness(
    settings: DeterrenceSettings,
    zones: Vec<Zone>,
    detector: Arc<dyn Detector>,
    camera: Arc<dyn CameraClient>,
    fail_actuation: bool,
) -> Harness {
    let store = SettingsStore::new(settings);
    let irrigation = RecordingIrrigation::new(fail_actuation);
    let engine = DecisionEngine::new(
        WatcherConfig::default(),
        store.clone(),
        zones,
        camera,
        detector,
        irrigation.clone(),
    );
    Harness {
        engine,
        settings: store,
        irrigation,
    }
}

fn default_harness(settings: DeterrenceSettings) -> Harness {
    harness(
        settings,
        vec![full_frame_zone()],
        Arc::new(ScriptedDetector {
            rows: one_detection(),
        }),
        Arc::new(StaticCamera {
            width: 1920,
            height: 1080,
        }),
        false,
    )
}

#[tokio::test]
async fn test_dispatch_requires_confirmation() {
    let h = default_harness(test_settings(3, 0));

    let r1 = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert_eq!(
        r1.outcome_for("garden"),
        Some(&ZoneOutcome::Accumulating {
            observed: 1,
            required: 3
        })
    );

    let r2 = h.engine.run_cycle_at("north", at(4), summer_noon()).await;
    assert_eq!(
        r2.outcome_for("garden"),
        Some(&ZoneOutcome::Accumulating {
            observed: 2,
            required: 3
        })
    );

    let r3 = h.engine.run_cycle_at("north", at(9), summer_noon()).await;
    assert_eq!(r3.outcome_for("garden"), Some(&ZoneOutcome::Activated));

    // Exactly one dispatch, with the zone's targets and configured run time
    assert_eq!(h.irrigation.calls(), vec![(vec![1, 2], 10)]);
}

#[tokio::test]
async fn test_stale_detections_age_out_of_window() {
    let h = default_harness(test_settings(3, 0));

    h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    h.engine.run_cycle_at("north", at(6), summer_noon()).await;
    // At t=13 the t=0 event is beyond the 10s window
    let r3 = h.engine.run_cycle_at("north", at(13), summer_noon()).await;
    assert_eq!(
        r3.outcome_for("garden"),
        Some(&ZoneOutcome::Accumulating {
            observed: 2,
            required: 3
        })
    );
    assert!(h.irrigation.calls().is_empty());
}

#[tokio::test]
async fn test_snapshot_failure_skips_camera() {
    let h = harness(
        test_settings(1, 0),
        vec![full_frame_zone()],
        Arc::new(ScriptedDetector {
            rows: one_detection(),
        }),
        Arc::new(FailingCamera),
        false,
    );

    let report = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert!(!report.snapshot_ok);
    assert_eq!(report.detections, 0);
    assert!(report.zones.is_empty());
    assert!(h.irrigation.calls().is_empty());
}

#[tokio::test]
async fn test_unavailable_detector_degrades_to_zero_detections() {
    let h = harness(
        test_settings(1, 0),
        vec![full_frame_zone()],
        Arc::new(UnavailableDetector),
        Arc::new(StaticCamera {
            width: 1920,
            height: 1080,
        }),
        false,
    );

    let report = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert!(report.snapshot_ok);
    assert!(!report.detector_ok);
    assert_eq!(report.detections, 0);
    assert!(report.zones.is_empty());

    // The loop keeps running on later cycles
    let again = h.engine.run_cycle_at("north", at(5), summer_noon()).await;
    assert!(!again.detector_ok);
    assert!(h.irrigation.calls().is_empty());
}

#[tokio::test]
async fn test_out_of_season_suppresses_but_keeps_confirmation() {
    let mut settings = test_settings(3, 0);
    settings.season_start = "04-01".parse().unwrap();
    settings.season_end = "10-31".parse().unwrap();
    let h = default_harness(settings);

    // Accumulate and confirm in January, outside the season
    let winter = local(1, 16, 12);
    h.engine.run_cycle_at("north", at(0), winter).await;
    h.engine.run_cycle_at("north", at(2), winter).await;
    let r3 = h.engine.run_cycle_at("north", at(4), winter).await;
    assert_eq!(r3.outcome_for("garden"), Some(&ZoneOutcome::OutOfSeason));
    assert!(h.irrigation.calls().is_empty());

    // Confirmation state survived the suppression: the first in-season
    // cycle dispatches without re-accumulating from scratch
    let r4 = h.engine.run_cycle_at("north", at(6), summer_noon()).await;
    assert_eq!(r4.outcome_for("garden"), Some(&ZoneOutcome::Activated));
    assert_eq!(h.irrigation.calls().len(), 1);
}

#[tokio::test]
async fn test_wrapping_season_permits_winter_dispatch() {
    let mut settings = test_settings(1, 0);
    settings.season_start = "11-01".parse().unwrap();
    settings.season_end = "03-31".parse().unwrap();
    let h = default_harness(settings);

    let report = h.engine.run_cycle_at("north", at(0), local(1, 16, 12)).await;
    assert_eq!(report.outcome_for("garden"), Some(&ZoneOutcome::Activated));
}

#[tokio::test]
async fn test_active_hours_gate() {
    let mut settings = test_settings(1, 0);
    settings.active_hours_enabled = true;
    settings.active_hours_start_hour = 20;
    settings.active_hours_end_hour = 6;
    let h = default_harness(settings);

    // Noon is outside a 20:00-06:59 window
    let daytime = h.engine.run_cycle_at("north", at(0), local(6, 15, 12)).await;
    assert_eq!(
        daytime.outcome_for("garden"),
        Some(&ZoneOutcome::OutsideActiveHours)
    );
    assert!(h.irrigation.calls().is_empty());

    // 23:00 wraps into the window
    let night = h.engine.run_cycle_at("north", at(5), local(6, 15, 23)).await;
    assert_eq!(night.outcome_for("garden"), Some(&ZoneOutcome::Activated));
    assert_eq!(h.irrigation.calls().len(), 1);
}

#[tokio::test]
async fn test_cooldown_blocks_then_releases() {
    let h = default_harness(test_settings(1, 300));

    let r1 = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert_eq!(r1.outcome_for("garden"), Some(&ZoneOutcome::Activated));

    let r2 = h.engine.run_cycle_at("north", at(100), summer_noon()).await;
    assert_eq!(
        r2.outcome_for("garden"),
        Some(&ZoneOutcome::CoolingDown { remaining_secs: 200 })
    );

    let r3 = h.engine.run_cycle_at("north", at(310), summer_noon()).await;
    assert_eq!(r3.outcome_for("garden"), Some(&ZoneOutcome::Activated));

    assert_eq!(h.irrigation.calls().len(), 2);
}

#[tokio::test]
async fn test_failed_actuation_does_not_start_cooldown() {
    let h = harness(
        test_settings(1, 300),
        vec![full_frame_zone()],
        Arc::new(ScriptedDetector {
            rows: one_detection(),
        }),
        Arc::new(StaticCamera {
            width: 1920,
            height: 1080,
        }),
        true,
    );

    let r1 = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert_eq!(r1.outcome_for("garden"), Some(&ZoneOutcome::ActivationFailed));

    // Next confirmed cycle retries instead of reporting a cooldown
    let r2 = h.engine.run_cycle_at("north", at(5), summer_noon()).await;
    assert_eq!(r2.outcome_for("garden"), Some(&ZoneOutcome::ActivationFailed));
    assert_eq!(h.irrigation.calls().len(), 2);
}

#[tokio::test]
async fn test_dry_run_evaluates_everything_but_never_dispatches() {
    let mut settings = test_settings(1, 300);
    settings.dry_run = true;
    let h = default_harness(settings);

    let r1 = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert_eq!(r1.outcome_for("garden"), Some(&ZoneOutcome::WouldActivate));

    // No cooldown was started by the dry-run decision
    let r2 = h.engine.run_cycle_at("north", at(5), summer_noon()).await;
    assert_eq!(r2.outcome_for("garden"), Some(&ZoneOutcome::WouldActivate));
    assert!(h.irrigation.calls().is_empty());

    // Flip dry_run off at runtime; the next cycle dispatches immediately
    let mut live = test_settings(1, 300);
    live.dry_run = false;
    h.settings.replace(live);

    let r3 = h.engine.run_cycle_at("north", at(10), summer_noon()).await;
    assert_eq!(r3.outcome_for("garden"), Some(&ZoneOutcome::Activated));
    assert_eq!(h.irrigation.calls().len(), 1);
}

#[tokio::test]
async fn test_overlapping_zones_each_decide_independently() {
    let zones = vec![
        zone("left", NormalizedRect::new(0.0, 0.0, 0.5, 1.0), vec![1]),
        zone("right", NormalizedRect::new(0.5, 0.0, 1.0, 1.0), vec![2]),
        zone("wide", NormalizedRect::new(0.0, 0.0, 1.0, 1.0), vec![3, 4]),
    ];
    // Center maps to (450, 253) on a 1920x1080 frame: left half
    let h = harness(
        test_settings(1, 0),
        zones,
        Arc::new(ScriptedDetector {
            rows: one_detection(),
        }),
        Arc::new(StaticCamera {
            width: 1920,
            height: 1080,
        }),
        false,
    );

    let report = h.engine.run_cycle_at("north", at(0), summer_noon()).await;

    // Hit zones appear in configuration order; the unhit zone is absent
    let names: Vec<&str> = report.zones.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["left", "wide"]);
    assert!(report.outcome_for("right").is_none());

    assert_eq!(h.irrigation.calls(), vec![(vec![1], 10), (vec![3, 4], 10)]);
}

#[tokio::test]
async fn test_camera_without_zones_reports_detections_only() {
    let h = harness(
        test_settings(1, 0),
        vec![full_frame_zone()],
        Arc::new(ScriptedDetector {
            rows: one_detection(),
        }),
        Arc::new(StaticCamera {
            width: 1920,
            height: 1080,
        }),
        false,
    );

    // No zones are configured for this camera name
    let report = h.engine.run_cycle_at("south", at(0), summer_noon()).await;
    assert!(report.snapshot_ok);
    assert_eq!(report.detections, 1);
    assert!(report.zones.is_empty());
    assert!(h.irrigation.calls().is_empty());
}

#[tokio::test]
async fn test_low_confidence_detection_never_enters_pipeline() {
    let h = harness(
        test_settings(1, 0),
        vec![full_frame_zone()],
        Arc::new(ScriptedDetector {
            // 0.3 sits below the 0.5 threshold
            rows: vec![[100.0, 100.0, 200.0, 200.0, 0.3, 0.0]],
        }),
        Arc::new(StaticCamera {
            width: 1920,
            height: 1080,
        }),
        false,
    );

    let report = h.engine.run_cycle_at("north", at(0), summer_noon()).await;
    assert!(report.detector_ok);
    assert_eq!(report.detections, 0);
    assert!(report.zones.is_empty());
    assert!(h.irrigation.calls().is_empty());
}
