//! Process-wide logger registry
//!
//! Instances publish themselves under their configured `var_key`. The
//! registry is an explicit object the composition root owns and injects
//! into call sites; there is no ambient global slot.

use super::facade::ServiceLogger;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct LoggerRegistry {
    slots: RwLock<HashMap<String, Arc<ServiceLogger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a logger under its configured `var_key`, replacing any
    /// previous occupant of that slot.
    pub fn publish(&self, logger: Arc<ServiceLogger>) {
        let key = logger.options().var_key.clone();
        self.publish_as(key, logger);
    }

    /// Publish a logger under an explicit key.
    pub fn publish_as(&self, key: impl Into<String>, logger: Arc<ServiceLogger>) {
        self.slots.write().insert(key.into(), logger);
    }

    pub fn get(&self, key: &str) -> Option<Arc<ServiceLogger>> {
        self.slots.read().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Arc<ServiceLogger>> {
        self.slots.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
