//! Per-entity stat instances

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::instance::ModifiedInstance;
use super::modifier::StatModifier;

/// One [`ModifiedInstance`] per stat name, created on first access
#[derive(Default)]
pub struct StatMap {
    instances: RwLock<HashMap<String, Arc<ModifiedInstance<StatModifier>>>>,
}

impl StatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the instance of a stat, creating it if needed
    pub fn instance(&self, stat: &str) -> Arc<ModifiedInstance<StatModifier>> {
        if let Some(instance) = self.instances.read().get(stat) {
            return Arc::clone(instance);
        }
        let mut instances = self.instances.write();
        Arc::clone(instances.entry(stat.to_string()).or_default())
    }

    pub fn get(&self, stat: &str) -> Option<Arc<ModifiedInstance<StatModifier>>> {
        self.instances.read().get(stat).cloned()
    }

    /// Main-hand total of a stat. Stats without modifiers return `base`.
    pub fn total(&self, stat: &str, base: f64) -> f64 {
        self.get(stat).map_or(base, |instance| instance.total(base))
    }

    /// Remove and release every modifier whose key matches, across all stats
    pub fn remove_if(&self, condition: impl Fn(&str) -> bool) -> usize {
        self.instances
            .read()
            .values()
            .map(|instance| instance.remove_if(&condition))
            .sum()
    }

    pub fn stats(&self) -> Vec<String> {
        self.instances.read().keys().cloned().collect()
    }

    /// Remove and release every modifier of every stat
    pub fn clear(&self) {
        let drained: Vec<_> = self.instances.write().drain().map(|(_, i)| i).collect();
        for instance in drained {
            instance.clear();
        }
    }
}
