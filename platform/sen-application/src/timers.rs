use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Identifies one scheduled callback. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Deferred-callback capability of the display surface.
pub trait Scheduler {
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle;

    /// Returns `false` when the handle already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Single-threaded timer queue driven by the event loop.
///
/// Time is an offset from the start of the session. The loop feeds it wall
/// time; tests feed it virtual time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), TimerHandle>,
    deadlines: HashMap<TimerHandle, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pops the earliest timer due at or before `until` and moves the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }
        let handle = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&handle);
        self.now = self.now.max(deadline);
        Some(handle)
    }

    /// Moves the clock forward. Going backwards is ignored.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for TimerQueue {
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let handle = TimerHandle(id);
        let deadline = self.now.saturating_add(delay);
        self.pending.insert((deadline, id), handle);
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => {
                self.pending.remove(&(deadline, handle.0));
                true
            }
            None => false,
        }
    }
}
