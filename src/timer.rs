// Deterministic replacement for browser timers. Nothing fires on its own: the owner polls
// `pop_due` with the current time and handles the returned actions.

use std::collections::BTreeMap;
use std::time::Duration;

use instant::Instant;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct TimerEntry<A> {
    deadline: Instant,
    period: Option<Duration>,
    action: A,
}

// Timers fire in deadline order; timers with equal deadlines fire in creation order.
#[derive(Clone, Debug)]
pub struct TimerQueue<A> {
    next_id: u64,
    timers: BTreeMap<TimerId, TimerEntry<A>>,
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self { TimerQueue { next_id: 0, timers: BTreeMap::new() } }

    fn add(&mut self, entry: TimerEntry<A>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, entry);
        id
    }

    pub fn set_timeout(&mut self, now: Instant, delay: Duration, action: A) -> TimerId {
        self.add(TimerEntry { deadline: now + delay, period: None, action })
    }

    // Returns false if the timer has already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool { self.timers.remove(&id).is_some() }
    pub fn clear_all(&mut self) { self.timers.clear(); }

    pub fn is_active(&self, id: TimerId) -> bool { self.timers.contains_key(&id) }
    pub fn len(&self) -> usize { self.timers.len() }
    pub fn is_empty(&self) -> bool { self.timers.is_empty() }

    fn earliest(&self) -> Option<(TimerId, Instant)> {
        self.timers
            .iter()
            .map(|(&id, entry)| (id, entry.deadline))
            .min_by_key(|&(id, deadline)| (deadline, id))
    }

    pub fn next_deadline(&self) -> Option<Instant> { self.earliest().map(|(_, deadline)| deadline) }
}

impl<A: Clone> TimerQueue<A> {
    // Panics if `period` is zero.
    pub fn set_interval(&mut self, now: Instant, period: Duration, action: A) -> TimerId {
        assert!(!period.is_zero(), "interval period must be positive");
        self.add(TimerEntry {
            deadline: now + period,
            period: Some(period),
            action,
        })
    }

    // Removes and returns the earliest timer that is due at `now`. Intervals are re-armed; an
    // interval that fell behind fires once and skips the missed periods.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, A)> {
        let (id, deadline) = self.earliest()?;
        if deadline > now {
            return None;
        }
        let entry = self.timers.get_mut(&id)?;
        match entry.period {
            None => {
                let entry = self.timers.remove(&id)?;
                Some((id, entry.action))
            }
            Some(period) => {
                let mut next = entry.deadline + period;
                if next <= now {
                    next = now + period;
                }
                entry.deadline = next;
                Some((id, entry.action.clone()))
            }
        }
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self { Self::new() }
}
