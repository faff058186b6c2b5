//! CritterWatch decision engine.
//!
//! Watches garden cameras for wildlife and fires sprinkler zones to chase
//! animals off. The pipeline per camera cycle:
//! 1. Fetch a snapshot
//! 2. Run detection and post-process the raw output
//! 3. Map detections onto configured zones
//! 4. Confirm presence over a sliding window
//! 5. Gate on season, active hours, and per-zone cooldown
//! 6. Dispatch sprinkler activation
//!
//! Transient collaborator failures degrade the cycle instead of stopping
//! the loop; configuration problems abort startup.

pub mod config;
pub mod confirmation;
pub mod cooldown;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod schedule;
pub mod settings_store;
pub mod site;
pub mod state;
pub mod watcher;
pub mod zones;

pub use config::WatcherConfig;
pub use confirmation::{ConfirmationState, ConfirmationTracker};
pub use cooldown::CooldownTracker;
pub use cycle::{CycleReport, ZoneOutcome};
pub use engine::DecisionEngine;
pub use error::{EngineError, EngineResult};
pub use schedule::ScheduleDecision;
pub use settings_store::SettingsStore;
pub use site::load_site_config;
pub use state::EngineState;
pub use watcher::Watcher;
