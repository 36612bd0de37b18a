// Cached ray result with time-based decay

use super::interface::RayHit;
use std::time::{Duration, Instant};

/// How long a hit stays valid without being refreshed
pub const RAY_DECAY: Duration = Duration::from_millis(100);

/// Holds the most recent hit of a repeated ray query.
///
/// Misses do not clear the cache; only the absence of a fresh hit for
/// the decay window does. This turns sparse hit reports into a level signal.
#[derive(Debug, Clone)]
pub struct RayProbe {
    last_hit: RayHit,
    hit_at: Option<Instant>,
    decay: Duration,
}

impl RayProbe {
    pub fn new() -> Self {
        Self::with_decay(RAY_DECAY)
    }

    pub fn with_decay(decay: Duration) -> Self {
        Self {
            last_hit: RayHit::MISS,
            hit_at: None,
            decay,
        }
    }

    /// Record a query result taken at `now`
    pub fn record(&mut self, hit: RayHit, now: Instant) {
        if hit.has_hit {
            self.last_hit = hit;
            self.hit_at = Some(now);
        }
    }

    /// The cached result as seen at `now`
    pub fn current(&self, now: Instant) -> RayHit {
        match self.hit_at {
            Some(at) if now.saturating_duration_since(at) < self.decay => self.last_hit,
            _ => RayHit::MISS,
        }
    }

    pub fn clear(&mut self) {
        self.last_hit = RayHit::MISS;
        self.hit_at = None;
    }
}

impl Default for RayProbe {
    fn default() -> Self {
        Self::new()
    }
}
