//! The detection-to-actuation decision engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use cwatch_clients::{CameraClient, IrrigationClient};
use cwatch_detect::{Detector, PostprocessConfig, Postprocessor};
use cwatch_models::{Detection, DeterrenceSettings, Snapshot, Zone};

use crate::config::WatcherConfig;
use crate::confirmation::ConfirmationState;
use crate::cycle::{CycleReport, ZoneOutcome};
use crate::metrics;
use crate::schedule::{self, ScheduleDecision};
use crate::settings_store::SettingsStore;
use crate::state::EngineState;
use crate::zones::map_to_zones;

/// Runs the decision pipeline for one camera at a time.
///
/// One instance is shared by every camera task. Collaborator calls are
/// bounded by per-call timeouts so a hung vendor API cannot stall the
/// loop, and zone state sits behind one mutex because overlapping camera
/// views can touch the same zone.
pub struct DecisionEngine {
    config: WatcherConfig,
    settings: SettingsStore,
    zones_by_camera: HashMap<String, Vec<Zone>>,
    camera_client: Arc<dyn CameraClient>,
    detector: Arc<dyn Detector>,
    irrigation: Arc<dyn IrrigationClient>,
    state: Mutex<EngineState>,
}

impl DecisionEngine {
    pub fn new(
        config: WatcherConfig,
        settings: SettingsStore,
        zones: Vec<Zone>,
        camera_client: Arc<dyn CameraClient>,
        detector: Arc<dyn Detector>,
        irrigation: Arc<dyn IrrigationClient>,
    ) -> Self {
        let mut zones_by_camera: HashMap<String, Vec<Zone>> = HashMap::new();
        for zone in zones {
            zones_by_camera
                .entry(zone.camera_id.clone())
                .or_default()
                .push(zone);
        }

        Self {
            config,
            settings,
            zones_by_camera,
            camera_client,
            detector,
            irrigation,
            state: Mutex::new(EngineState::new()),
        }
    }

    /// Run one polling cycle for a camera at the current wall-clock time.
    pub async fn run_cycle(&self, camera: &str) -> CycleReport {
        self.run_cycle_at(camera, Utc::now(), Local::now().naive_local())
            .await
    }

    /// Run one polling cycle as of the given instants. `now` drives the
    /// confirmation and cooldown clocks, `local_now` the calendar gates.
    ///
    /// Transient collaborator failures resolve to "no actuation this
    /// cycle" and are recorded in the report; nothing here propagates an
    /// error out of the loop.
    pub async fn run_cycle_at(
        &self,
        camera: &str,
        now: DateTime<Utc>,
        local_now: NaiveDateTime,
    ) -> CycleReport {
        metrics::record_cycle(camera);
        let settings = self.settings.current();
        let mut report = CycleReport {
            camera: camera.to_string(),
            ..Default::default()
        };

        // A camera with no snapshot is skipped for this cycle
        let snapshot = match self.fetch_snapshot(camera).await {
            Some(s) => s,
            None => return report,
        };
        report.snapshot_ok = true;

        // An unreachable detector degrades to zero detections; the cycle
        // still runs so state can age naturally
        let detections = match self.detect(camera, &snapshot, &settings).await {
            Some(d) => {
                report.detector_ok = true;
                d
            }
            None => Vec::new(),
        };
        report.detections = detections.len();
        metrics::record_detections(camera, detections.len());

        let Some(zones) = self.zones_by_camera.get(camera) else {
            return report;
        };

        let hits = map_to_zones(&detections, zones, snapshot.width, snapshot.height);

        // Zones are visited in configuration order for deterministic
        // reports; zones without hits this cycle are left alone
        for zone in zones {
            let Some(zone_hits) = hits.get(zone.name.as_str()) else {
                continue;
            };
            let outcome = self
                .decide_zone(zone, zone_hits.len(), &settings, now, local_now)
                .await;
            report.zones.push((zone.name.clone(), outcome));
        }

        report
    }

    async fn fetch_snapshot(&self, camera: &str) -> Option<Snapshot> {
        let fetch = self.camera_client.get_snapshot(camera);
        match tokio::time::timeout(self.config.snapshot_timeout, fetch).await {
            Ok(Ok(snapshot)) => {
                debug!(
                    camera,
                    width = snapshot.width,
                    height = snapshot.height,
                    "Snapshot fetched"
                );
                Some(snapshot)
            }
            Ok(Err(e)) => {
                info!(camera, error = %e, "Snapshot unavailable, skipping camera this cycle");
                metrics::record_snapshot_failure(camera);
                None
            }
            Err(_) => {
                warn!(
                    camera,
                    timeout_secs = self.config.snapshot_timeout.as_secs(),
                    "Snapshot fetch timed out, skipping camera this cycle"
                );
                metrics::record_snapshot_failure(camera);
                None
            }
        }
    }

    async fn detect(
        &self,
        camera: &str,
        snapshot: &Snapshot,
        settings: &DeterrenceSettings,
    ) -> Option<Vec<Detection>> {
        let infer = self.detector.infer(snapshot);
        let raw = match tokio::time::timeout(self.config.inference_timeout, infer).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) if e.is_model_unavailable() => {
                info!(
                    camera,
                    detector = self.detector.name(),
                    error = %e,
                    "Detector unavailable, treating as zero detections"
                );
                metrics::record_detector_failure(camera, "unavailable");
                return None;
            }
            Ok(Err(e)) => {
                warn!(
                    camera,
                    detector = self.detector.name(),
                    error = %e,
                    "Inference failed, treating as zero detections"
                );
                metrics::record_detector_failure(camera, "failed");
                return None;
            }
            Err(_) => {
                warn!(
                    camera,
                    detector = self.detector.name(),
                    timeout_secs = self.config.inference_timeout.as_secs(),
                    "Inference timed out, treating as zero detections"
                );
                metrics::record_detector_failure(camera, "timeout");
                return None;
            }
        };

        let postprocessor = Postprocessor::new(PostprocessConfig {
            confidence_threshold: settings.confidence_threshold,
            iou_threshold: settings.iou_threshold,
            input_width: self.config.model_input_width,
            input_height: self.config.model_input_height,
            letterbox: self.config.model_letterbox,
        });
        Some(postprocessor.run(&raw, snapshot.width, snapshot.height))
    }

    /// Walk one zone through confirmation, the calendar gates, cooldown,
    /// and dispatch.
    async fn decide_zone(
        &self,
        zone: &Zone,
        hit_count: usize,
        settings: &DeterrenceSettings,
        now: DateTime<Utc>,
        local_now: NaiveDateTime,
    ) -> ZoneOutcome {
        let (state, observed) = {
            let mut guard = self.lock_state();
            let state = guard.confirmations.record_and_check(
                &zone.name,
                now,
                settings.confirmation_window(),
                settings.required_detections,
            );
            (state, guard.confirmations.observed(&zone.name))
        };

        if state != ConfirmationState::Confirmed {
            debug!(
                zone = %zone.name,
                observed,
                required = settings.required_detections,
                "Accumulating detections"
            );
            return ZoneOutcome::Accumulating {
                observed,
                required: settings.required_detections,
            };
        }

        info!(zone = %zone.name, detections = hit_count, "Zone presence confirmed");
        metrics::record_confirmation(&zone.name);

        // Calendar gates suppress quietly; confirmation state stays put so
        // a presence spanning a window edge can fire as soon as it opens
        match schedule::gate(settings, local_now) {
            ScheduleDecision::Permitted => {}
            ScheduleDecision::OutOfSeason => {
                debug!(zone = %zone.name, "Out of season, suppressing actuation");
                metrics::record_suppression(&zone.name, "season");
                return ZoneOutcome::OutOfSeason;
            }
            ScheduleDecision::OutsideActiveHours => {
                debug!(zone = %zone.name, "Outside active hours, suppressing actuation");
                metrics::record_suppression(&zone.name, "active_hours");
                return ZoneOutcome::OutsideActiveHours;
            }
        }

        {
            let guard = self.lock_state();
            if !guard
                .cooldowns
                .can_activate(&zone.name, now, settings.zone_cooldown())
            {
                let remaining_secs =
                    guard
                        .cooldowns
                        .remaining_secs(&zone.name, now, settings.zone_cooldown());
                debug!(zone = %zone.name, remaining_secs, "Zone cooling down");
                metrics::record_suppression(&zone.name, "cooldown");
                return ZoneOutcome::CoolingDown { remaining_secs };
            }
        }

        if settings.dry_run {
            info!(
                zone = %zone.name,
                targets = ?zone.sprinkler_targets,
                duration_secs = settings.actuation_duration_seconds,
                "Dry run: would activate sprinklers"
            );
            metrics::record_dry_run(&zone.name);
            return ZoneOutcome::WouldActivate;
        }

        match self.dispatch(zone, settings).await {
            Ok(()) => {
                self.lock_state().cooldowns.mark_activated(&zone.name, now);
                info!(
                    zone = %zone.name,
                    targets = ?zone.sprinkler_targets,
                    duration_secs = settings.actuation_duration_seconds,
                    "Sprinklers activated"
                );
                metrics::record_activation(&zone.name);
                ZoneOutcome::Activated
            }
            Err(e) => {
                // No cooldown update on failure: the next confirmed cycle
                // is free to retry
                warn!(zone = %zone.name, error = %e, "Sprinkler activation failed");
                metrics::record_activation_failure(&zone.name);
                ZoneOutcome::ActivationFailed
            }
        }
    }

    async fn dispatch(&self, zone: &Zone, settings: &DeterrenceSettings) -> crate::EngineResult<()> {
        let activate = self
            .irrigation
            .activate(&zone.sprinkler_targets, settings.actuation_duration_seconds);
        match tokio::time::timeout(self.config.actuation_timeout, activate).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(crate::EngineError::timeout(
                self.config.actuation_timeout.as_secs(),
            )),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
