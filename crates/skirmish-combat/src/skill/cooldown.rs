//! Per-entity skill cooldowns, measured in server ticks

use std::collections::HashMap;

use parking_lot::Mutex;

use super::handler::SkillId;

/// Server ticks per second
pub const TICKS_PER_SECOND: u64 = 20;

/// Convert a duration in seconds into ticks. Negative durations are zero.
pub fn seconds_to_ticks(seconds: f64) -> u64 {
    (seconds.max(0.0) * TICKS_PER_SECOND as f64).round() as u64
}

/// Skill id to the tick its cooldown expires at
#[derive(Debug, Default)]
pub struct CooldownMap {
    expiries: Mutex<HashMap<SkillId, u64>>,
}

impl CooldownMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cooldown of `duration` ticks from `now`
    pub fn put(&self, skill: SkillId, now: u64, duration: u64) {
        if duration == 0 {
            self.expiries.lock().remove(&skill);
            return;
        }
        self.expiries.lock().insert(skill, now + duration);
    }

    /// Whether `skill` is off cooldown at `now`. Expired entries are dropped.
    pub fn test_silently(&self, skill: &SkillId, now: u64) -> bool {
        let mut expiries = self.expiries.lock();
        match expiries.get(skill) {
            Some(&expiry) if expiry > now => false,
            Some(_) => {
                expiries.remove(skill);
                true
            }
            None => true,
        }
    }

    /// Ticks left before `skill` can be cast again
    pub fn remaining(&self, skill: &SkillId, now: u64) -> u64 {
        self.expiries
            .lock()
            .get(skill)
            .map_or(0, |&expiry| expiry.saturating_sub(now))
    }

    pub fn clear(&self) {
        self.expiries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_expires() {
        let cooldowns = CooldownMap::new();
        let dash = SkillId::new("dash");
        assert!(cooldowns.test_silently(&dash, 0));

        cooldowns.put(dash.clone(), 10, seconds_to_ticks(1.5));
        assert!(!cooldowns.test_silently(&dash, 39));
        assert_eq!(cooldowns.remaining(&dash, 30), 10);
        assert!(cooldowns.test_silently(&dash, 40));
        assert_eq!(cooldowns.remaining(&dash, 40), 0);
    }

    #[test]
    fn test_zero_duration_clears() {
        let cooldowns = CooldownMap::new();
        let dash = SkillId::new("dash");
        cooldowns.put(dash.clone(), 0, 100);
        cooldowns.put(dash.clone(), 5, 0);
        assert!(cooldowns.test_silently(&dash, 5));
        assert_eq!(seconds_to_ticks(-3.0), 0);
    }
}
