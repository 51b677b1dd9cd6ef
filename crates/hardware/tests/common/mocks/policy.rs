use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cachesim_core::cache::{Block, EvictionPolicy};
use cachesim_core::common::{CacheError, Result, Tag};

/// Policy that returns pre-scripted victims and records every access.
///
/// The access log is shared so a test can inspect it after the policy has
/// been moved into a set.
#[derive(Debug, Default)]
pub struct ScriptedPolicy {
    victims: VecDeque<Tag>,
    accesses: Arc<Mutex<Vec<Tag>>>,
}

impl ScriptedPolicy {
    pub fn new(victims: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            victims: victims.into_iter().collect(),
            accesses: Arc::default(),
        }
    }

    /// Handle to the access log.
    pub fn access_log(&self) -> Arc<Mutex<Vec<Tag>>> {
        Arc::clone(&self.accesses)
    }
}

impl EvictionPolicy for ScriptedPolicy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn record_access(&mut self, tag: Tag) {
        self.accesses.lock().unwrap().push(tag);
    }

    fn select_victim(&mut self, resident: &[Block]) -> Result<Tag> {
        if resident.is_empty() {
            return Err(CacheError::EvictionOnEmptySet);
        }
        self.victims
            .pop_front()
            .ok_or_else(|| CacheError::InternalInconsistency("script exhausted".into()))
    }

    fn tracks(&self, tag: Tag) -> bool {
        self.accesses.lock().unwrap().contains(&tag)
    }
}
