//! Shared handle to the current deterrence settings.

use std::sync::{Arc, PoisonError, RwLock};

use cwatch_models::DeterrenceSettings;
use tracing::info;

/// Cheaply cloneable handle to the live settings.
///
/// Cycles take one `Arc` snapshot up front so a concurrent replace can
/// never produce a half-old, half-new view mid-cycle. Writers swap the
/// whole value.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<Arc<DeterrenceSettings>>>,
}

impl SettingsStore {
    pub fn new(settings: DeterrenceSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Arc<DeterrenceSettings> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the settings wholesale. In-flight cycles keep the snapshot
    /// they already took.
    pub fn replace(&self, settings: DeterrenceSettings) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(settings);
        info!(dry_run = guard.dry_run, "Settings replaced");
    }
}
