use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use skirmish_core::TaskId;

/// Callback run by a scheduler.
pub type TaskCallback = Arc<dyn Fn() + Send + Sync>;

/// Host scheduler contract: run a callback after `delay` ticks, then every
/// `period` ticks until cancelled. A `period` of zero runs it once.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, callback: TaskCallback, delay: u64, period: u64) -> TaskId;

    /// Stop a task. Cancelling an unknown or finished task does nothing.
    fn cancel(&self, task: TaskId);

    /// Whether a task will never run again.
    fn is_cancelled(&self, task: TaskId) -> bool;
}

struct ScheduledTask {
    callback: TaskCallback,
    next_run: u64,
    period: u64,
}

/// In-process scheduler driven by explicit [`TickScheduler::tick`] calls.
///
/// Due tasks run in the order they were scheduled. Callbacks run without the
/// task table locked, so they may schedule or cancel tasks themselves.
pub struct TickScheduler {
    current_tick: AtomicU64,
    next_id: AtomicU64,
    tasks: Mutex<BTreeMap<TaskId, ScheduledTask>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            current_tick: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(BTreeMap::new()),
        }
    }

    /// The tick most recently run.
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::SeqCst)
    }

    /// Advance one tick and run every due task. Returns how many ran.
    pub fn tick(&self) -> usize {
        let now = self.current_tick.fetch_add(1, Ordering::SeqCst) + 1;
        let due: Vec<TaskId> = self
            .tasks
            .lock()
            .iter()
            .filter(|(_, task)| task.next_run <= now)
            .map(|(&id, _)| id)
            .collect();

        let mut ran = 0;
        for id in due {
            // An earlier callback in this tick may have cancelled this one.
            let callback = {
                let mut tasks = self.tasks.lock();
                let Some(task) = tasks.get_mut(&id) else {
                    continue;
                };
                let callback = Arc::clone(&task.callback);
                if task.period == 0 {
                    tasks.remove(&id);
                } else {
                    task.next_run = now + task.period;
                }
                callback
            };
            callback();
            ran += 1;
        }
        ran
    }

    /// Run `count` ticks.
    pub fn advance(&self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Number of tasks still scheduled.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&self, callback: TaskCallback, delay: u64, period: u64) -> TaskId {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let next_run = self.current_tick() + delay.max(1);
        self.tasks.lock().insert(
            id,
            ScheduledTask {
                callback,
                next_run,
                period,
            },
        );
        id
    }

    fn cancel(&self, task: TaskId) {
        self.tasks.lock().remove(&task);
    }

    fn is_cancelled(&self, task: TaskId) -> bool {
        !self.tasks.lock().contains_key(&task)
    }
}
