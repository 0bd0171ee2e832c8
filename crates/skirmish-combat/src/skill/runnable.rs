//! Repeating skill effects and the per-entity casting set
//!
//! A channelled or lingering skill ticks on the scheduler until it asks to
//! stop or is cancelled. While it runs, its skill id sits in the caster's
//! casting set.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use skirmish_core::{EngineError, EngineResult, TaskId};
use tracing::debug;

use super::cast::SkillMetadata;
use super::handler::SkillId;
use crate::engine::CombatEngine;

/// Behaviour of a repeating skill effect
pub trait SkillRunnable: Send + Sync {
    /// Checked before every tick; returning `true` ends the task
    fn should_cancel(&self, engine: &CombatEngine, meta: &SkillMetadata) -> bool;

    fn tick(&self, engine: &CombatEngine, meta: &SkillMetadata);

    fn on_start(&self, _engine: &CombatEngine, _meta: &SkillMetadata) {}

    fn on_end(&self, _engine: &CombatEngine, _meta: &SkillMetadata) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Idle,
    /// Started, waiting for the scheduler to hand back an id
    Starting,
    Running(TaskId),
    /// `None` when the task ended before it had an id
    Ended(Option<TaskId>),
}

/// A [`SkillRunnable`] bound to one cast.
///
/// Can be scheduled once. Ending it, whether by `should_cancel` or by
/// [`cancel`](CastTask::cancel), tears it down exactly once. Ticks and
/// teardown never overlap.
pub struct CastTask<R: SkillRunnable> {
    runnable: R,
    meta: SkillMetadata,
    engine: Weak<CombatEngine>,
    state: Mutex<TaskState>,
    // held while starting, ticking and ending; reentrant so a tick may end its own task
    run_guard: ReentrantMutex<()>,
}

impl<R: SkillRunnable + 'static> CastTask<R> {
    pub fn new(engine: &Arc<CombatEngine>, meta: SkillMetadata, runnable: R) -> Arc<Self> {
        Arc::new(Self {
            runnable,
            meta,
            engine: Arc::downgrade(engine),
            state: Mutex::new(TaskState::Idle),
            run_guard: ReentrantMutex::new(()),
        })
    }

    pub fn runnable(&self) -> &R {
        &self.runnable
    }

    pub fn meta(&self) -> &SkillMetadata {
        &self.meta
    }

    fn skill_id(&self) -> &SkillId {
        self.meta.skill().id()
    }

    fn engine(&self) -> EngineResult<Arc<CombatEngine>> {
        self.engine
            .upgrade()
            .ok_or_else(|| EngineError::illegal_state("combat engine was dropped"))
    }

    /// Start ticking after `delay` ticks, then every `period` ticks.
    ///
    /// The caster is marked as casting and `on_start` runs before the task
    /// reaches the scheduler. Fails with `IllegalState` if the task was
    /// already scheduled.
    pub fn run_task(self: &Arc<Self>, delay: u64, period: u64) -> EngineResult<TaskId> {
        let engine = self.engine()?;
        let _guard = self.run_guard.lock();
        {
            let mut state = self.state.lock();
            match *state {
                TaskState::Idle => *state = TaskState::Starting,
                TaskState::Running(id) | TaskState::Ended(Some(id)) => {
                    return Err(EngineError::illegal_state(format!("Already scheduled as {}", id)));
                }
                TaskState::Starting | TaskState::Ended(None) => {
                    return Err(EngineError::illegal_state("Already being scheduled"));
                }
            }
        }

        self.meta.caster_state().casting().on_cast_start(self.skill_id().clone());
        self.runnable.on_start(&engine, &self.meta);
        engine.events().cast_start(self.meta.caster().entity(), self.skill_id());

        let task = Arc::clone(self);
        let id = engine.scheduler().schedule(Arc::new(move || task.run()), delay, period.max(1));
        let ended_early = {
            let mut state = self.state.lock();
            let ended_early = *state != TaskState::Starting;
            *state = if ended_early {
                TaskState::Ended(Some(id))
            } else {
                TaskState::Running(id)
            };
            ended_early
        };
        if ended_early {
            // a scheduler that ran the first tick inline already ended the task
            engine.scheduler().cancel(id);
        }
        debug!(skill = %self.skill_id(), task = %id, "Skill task started");
        Ok(id)
    }

    /// One scheduler run: end the task if asked to, tick it otherwise
    pub fn run(&self) {
        let _guard = self.run_guard.lock();
        if !matches!(*self.state.lock(), TaskState::Running(_) | TaskState::Starting) {
            return;
        }
        let Ok(engine) = self.engine() else {
            return;
        };
        if self.runnable.should_cancel(&engine, &self.meta) {
            // cannot fail: the task is scheduled
            let _ = self.cancel();
        } else {
            self.runnable.tick(&engine, &self.meta);
        }
    }

    /// Stop the task, waiting for a tick in progress to finish. Cancelling
    /// an ended task does nothing.
    ///
    /// Fails with `IllegalState` if the task was never scheduled.
    pub fn cancel(&self) -> EngineResult<()> {
        let _guard = self.run_guard.lock();
        let id = {
            let mut state = self.state.lock();
            match *state {
                TaskState::Idle => return Err(EngineError::illegal_state("Not scheduled yet")),
                TaskState::Ended(_) => return Ok(()),
                TaskState::Starting => {
                    *state = TaskState::Ended(None);
                    None
                }
                TaskState::Running(id) => {
                    *state = TaskState::Ended(Some(id));
                    Some(id)
                }
            }
        };

        let Ok(engine) = self.engine() else {
            self.meta.caster_state().casting().on_cast_end(self.skill_id());
            return Ok(());
        };
        if let Some(id) = id {
            engine.scheduler().cancel(id);
        }
        self.runnable.on_end(&engine, &self.meta);
        self.meta.caster_state().casting().on_cast_end(self.skill_id());
        engine.events().cast_end(self.meta.caster().entity(), self.skill_id());
        debug!(skill = %self.skill_id(), task = ?id, "Skill task ended");
        Ok(())
    }

    /// Fails with `IllegalState` if the task was never scheduled.
    pub fn is_cancelled(&self) -> EngineResult<bool> {
        match *self.state.lock() {
            TaskState::Idle | TaskState::Starting => {
                Err(EngineError::illegal_state("Not scheduled yet"))
            }
            TaskState::Ended(_) => Ok(true),
            TaskState::Running(id) => Ok(self.engine()?.scheduler().is_cancelled(id)),
        }
    }

    /// Fails with `IllegalState` if the task was never scheduled.
    pub fn task_id(&self) -> EngineResult<TaskId> {
        match *self.state.lock() {
            TaskState::Running(id) | TaskState::Ended(Some(id)) => Ok(id),
            _ => Err(EngineError::illegal_state("Not scheduled yet")),
        }
    }
}

/// Skills an entity is currently casting
#[derive(Debug, Default)]
pub struct CastingSet {
    skills: Mutex<HashSet<SkillId>>,
}

impl CastingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the skill was not already being cast
    pub fn on_cast_start(&self, skill: SkillId) -> bool {
        self.skills.lock().insert(skill)
    }

    /// Returns `true` if the skill was being cast
    pub fn on_cast_end(&self, skill: &SkillId) -> bool {
        self.skills.lock().remove(skill)
    }

    pub fn is_casting(&self) -> bool {
        !self.skills.lock().is_empty()
    }

    pub fn is_casting_skill(&self, skill: &SkillId) -> bool {
        self.skills.lock().contains(skill)
    }

    pub fn clear(&self) {
        self.skills.lock().clear();
    }
}
