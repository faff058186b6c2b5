//! Camera polling loop.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, info};
use uuid::Uuid;

use cwatch_models::CameraConfig;

use crate::engine::DecisionEngine;

/// Polling daemon that drives the decision engine across all cameras.
///
/// Each tick runs every enabled camera's cycle on a bounded set of tasks,
/// so one slow camera cannot starve the others, and all cycles finish
/// before the next tick starts. A shutdown signal lets in-flight cycles
/// complete before the loop exits.
pub struct Watcher {
    engine: Arc<DecisionEngine>,
    cameras: Vec<CameraConfig>,
    poll_interval: Duration,
    camera_semaphore: Arc<Semaphore>,
    shutdown: watch::Sender<bool>,
    instance: String,
}

impl Watcher {
    pub fn new(
        engine: Arc<DecisionEngine>,
        cameras: Vec<CameraConfig>,
        poll_interval: Duration,
        max_parallel: usize,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            engine,
            cameras,
            poll_interval,
            camera_semaphore: Arc::new(Semaphore::new(max_parallel.max(1))),
            shutdown,
            instance: format!("watcher-{}", Uuid::new_v4()),
        }
    }

    /// Request a graceful stop. In-flight cycles run to completion.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Run the polling loop until shutdown.
    pub async fn run(&self) {
        info!(
            instance = %self.instance,
            cameras = self.cameras.len(),
            interval_secs = self.poll_interval.as_secs(),
            "Starting camera watcher"
        );

        let mut shutdown_rx = self.shutdown.subscribe();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping watcher");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.poll_all_cameras().await;
                }
            }
        }

        info!(instance = %self.instance, "Camera watcher stopped");
    }

    /// Run one polling pass over every enabled camera.
    ///
    /// A failure inside one camera's cycle never aborts the others; cycle
    /// errors are handled (and logged) inside the engine itself.
    pub async fn poll_all_cameras(&self) {
        let mut handles = Vec::new();

        for camera in self.cameras.iter().filter(|c| c.enabled) {
            let permit = match Arc::clone(&self.camera_semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let engine = Arc::clone(&self.engine);
            let name = camera.name.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let report = engine.run_cycle(&name).await;
                debug!(
                    camera = %report.camera,
                    snapshot_ok = report.snapshot_ok,
                    detections = report.detections,
                    zones = report.zones.len(),
                    "Cycle complete"
                );
            }));
        }

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!("Camera cycle task panicked: {}", e);
            }
        }
    }
}
