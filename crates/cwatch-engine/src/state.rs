//! Mutable decision-engine state.

use crate::confirmation::ConfirmationTracker;
use crate::cooldown::CooldownTracker;

/// All mutable state the decision loop owns.
///
/// Kept behind a single mutex in the engine: camera cycles run in
/// parallel, and overlapping camera views can in principle touch the same
/// zone, so zone state takes one writer at a time.
#[derive(Debug, Default)]
pub struct EngineState {
    pub confirmations: ConfirmationTracker,
    pub cooldowns: CooldownTracker,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }
}
