// Keyed wall-clock timers polled from the tick thread

use std::time::{Duration, Instant};

/// A single scheduled timer
#[derive(Debug, Clone, Copy)]
pub struct PendingTimer<K> {
    pub key: K,
    pub deadline: Instant,
}

impl<K> PendingTimer<K> {
    /// Check if this timer has fired at `now`
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Timer queue for one owner.
///
/// Timers never call back on their own: the owner polls the queue once per
/// tick, so nothing can fire after the owner clears it on teardown.
#[derive(Debug)]
pub struct Timers<K> {
    pending: Vec<PendingTimer<K>>,
}

impl<K: Copy + PartialEq> Timers<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(4),
        }
    }

    /// Schedule `key` to fire `after` the given instant.
    /// Re-scheduling an already pending key moves its deadline.
    pub fn schedule(&mut self, key: K, now: Instant, after: Duration) {
        self.cancel(key);
        self.pending.push(PendingTimer {
            key,
            deadline: now + after,
        });
    }

    /// Cancel a pending timer. Returns true if it was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        if let Some(pos) = self.pending.iter().position(|t| t.key == key) {
            self.pending.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check whether a timer is still waiting to fire
    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|t| t.key == key)
    }

    /// Remove and return every timer expired at `now`, earliest deadline first
    pub fn poll(&mut self, now: Instant) -> Vec<K> {
        let mut fired: Vec<PendingTimer<K>> = Vec::new();
        self.pending.retain(|timer| {
            if timer.is_expired(now) {
                fired.push(*timer);
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|t| t.deadline);
        fired.into_iter().map(|t| t.key).collect()
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq> Default for Timers<K> {
    fn default() -> Self {
        Self::new()
    }
}
