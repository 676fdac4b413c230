use std::collections::BTreeMap;
use std::time::Duration;

/// Fire-once timers in virtual time.
///
/// A timer scheduled while another one is firing is measured from the
/// firing timer's deadline, not from the end of the frame that happened
/// to deliver it.
pub struct TimerQueue<E> {
    now: Duration,
    seq: u64,
    pending: BTreeMap<(Duration, u64), E>,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, event: E) {
        let key = (self.now + delay, self.seq);
        self.seq += 1;
        self.pending.insert(key, event);
    }

    /// Removes the earliest timer due at or before `until` and moves the
    /// clock to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let (&(deadline, _), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }
        let ((deadline, _), event) = self.pending.pop_first()?;
        self.now = deadline;
        Some(event)
    }

    /// Moves the clock forward once nothing else is due.
    pub fn advance_to(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}
