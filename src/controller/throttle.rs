//! Trailing Throttle
//!
//! The first request of a burst schedules one fire a full cooldown later;
//! requests arriving while a fire is scheduled coalesce into it. Nothing
//! fires on the leading edge. Whoever fires reads the latest state, so the
//! last request always wins.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct TrailingThrottle {
    cooldown: Duration,
    pending: Option<Instant>,
}

impl TrailingThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, pending: None }
    }

    /// Schedule a fire and return its deadline.
    pub fn request(&mut self, now: Instant) -> Instant {
        if let Some(deadline) = self.pending {
            return deadline;
        }
        let deadline = now + self.cooldown;
        self.pending = Some(deadline);
        deadline
    }

    /// Scheduled trailing fire, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Consume the pending fire once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(100);

    #[test]
    fn test_first_request_waits_full_cooldown() {
        let start = Instant::now();
        let mut t = TrailingThrottle::new(COOLDOWN);
        assert_eq!(t.request(start), start + COOLDOWN);
        assert_eq!(t.deadline(), Some(start + COOLDOWN));
        assert!(!t.take_due(start));
    }

    #[test]
    fn test_burst_coalesces_to_single_trailing_fire() {
        let start = Instant::now();
        let mut t = TrailingThrottle::new(COOLDOWN);

        for i in 0..10u64 {
            let now = start + Duration::from_millis(i * 10);
            assert_eq!(t.request(now), start + COOLDOWN);
        }

        assert!(!t.take_due(start + Duration::from_millis(99)));
        assert!(t.take_due(start + COOLDOWN));
        assert!(!t.take_due(start + Duration::from_millis(150)));
        assert!(t.deadline().is_none());
    }

    #[test]
    fn test_request_after_fire_starts_new_window() {
        let start = Instant::now();
        let mut t = TrailingThrottle::new(COOLDOWN);
        t.request(start);
        assert!(t.take_due(start + COOLDOWN));

        let next = start + Duration::from_millis(150);
        assert_eq!(t.request(next), next + COOLDOWN);
        assert_eq!(t.request(start + Duration::from_millis(240)), next + COOLDOWN);
    }
}
