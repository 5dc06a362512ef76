//! Virtual-time task queue.
//!
//! Tasks are kept sorted by due time. Tasks due at the same instant run in
//! the order they were scheduled, so a clear scheduled before a step at the
//! same time always fires first.

/// A queue of tasks keyed by their due time in milliseconds.
#[derive(Debug)]
pub struct Timeline<T> {
    tasks: Vec<(u64, T)>,
    now: u64,
}

impl<T> Timeline<T> {
    /// Create an empty timeline at time zero.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            now: 0,
        }
    }

    /// Current time.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `task` to run `delay_ms` after the current time.
    pub fn schedule(&mut self, delay_ms: u64, task: T) {
        let at = self.now.saturating_add(delay_ms);
        let pos = self.tasks.partition_point(|(due, _)| *due <= at);
        self.tasks.insert(pos, (at, task));
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.first().map(|(due, _)| *due)
    }

    /// Remove the earliest task if it is due at or before `until`, moving the
    /// clock to its due time.
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, T)> {
        match self.tasks.first() {
            Some((due, _)) if *due <= until => {
                let (due, task) = self.tasks.remove(0);
                self.now = self.now.max(due);
                Some((due, task))
            }
            _ => None,
        }
    }

    /// Move the clock forward to `time`. The clock never goes backwards.
    pub fn set_now(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Keep only the pending tasks for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.tasks.retain(|(_, task)| keep(task));
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
