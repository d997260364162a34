// Fixed-window per-client rate limiting.
//
// One window entry per client IP: a count and the instant the window resets.
// Denied requests are not charged against the window. State is local to one
// process instance — this is a per-instance limiter, not a global one.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Prune the entry map once it grows past this many clients.
const PRUNE_THRESHOLD: usize = 1000;

/// Clock seam so tests can drive window expiry deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Denied { retry_after_secs: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_reset_at: Instant,
}

pub struct RateLimiter<C: Clock = SystemClock> {
    entries: Mutex<HashMap<IpAddr, WindowEntry>>,
    cap: u32,
    window: Duration,
    clock: C,
}

impl RateLimiter<SystemClock> {
    pub fn new(cap: u32, window: Duration) -> Self {
        Self::with_clock(cap, window, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(cap: u32, window: Duration, clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            cap,
            window,
            clock,
        }
    }

    /// Check the client's window and, if allowed, consume one request slot.
    /// A fresh or expired window resets to `now + window` with a count of
    /// zero before the request is counted.
    pub fn check_and_consume(&self, client: IpAddr) -> RateDecision {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");

        if entries.len() > PRUNE_THRESHOLD {
            entries.retain(|_, e| now < e.window_reset_at);
        }

        let entry = entries.entry(client).or_insert(WindowEntry {
            count: 0,
            window_reset_at: now + self.window,
        });

        if now >= entry.window_reset_at {
            entry.count = 0;
            entry.window_reset_at = now + self.window;
        }

        if entry.count >= self.cap {
            let remaining = entry.window_reset_at.duration_since(now);
            let mut retry_after_secs = remaining.as_secs();
            if remaining.subsec_nanos() > 0 {
                retry_after_secs += 1;
            }
            return RateDecision::Denied { retry_after_secs };
        }

        entry.count += 1;
        RateDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock that starts at a fixed instant and advances only when told to.
    struct ManualClock {
        base: Instant,
        offset_secs: AtomicU64,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset_secs: AtomicU64::new(0),
            }
        }

        fn advance_secs(&self, secs: u64) {
            self.offset_secs.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> Instant {
            self.base + Duration::from_secs(self.offset_secs.load(Ordering::SeqCst))
        }
    }

    fn client() -> IpAddr {
        "203.0.113.7".parse().unwrap()
    }

    #[test]
    fn allows_up_to_cap() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(15, Duration::from_secs(3600), &clock);
        for _ in 0..15 {
            assert!(limiter.check_and_consume(client()).is_allowed());
        }
    }

    #[test]
    fn sixteenth_request_denied_with_retry_hint() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(15, Duration::from_secs(3600), &clock);
        for _ in 0..15 {
            assert!(limiter.check_and_consume(client()).is_allowed());
        }
        clock.advance_secs(100);
        match limiter.check_and_consume(client()) {
            RateDecision::Denied { retry_after_secs } => {
                assert!(retry_after_secs > 0);
                assert!(retry_after_secs <= 3600);
                assert_eq!(retry_after_secs, 3500);
            }
            RateDecision::Allowed => panic!("16th request should be denied"),
        }
    }

    #[test]
    fn denied_requests_are_not_charged() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(2, Duration::from_secs(3600), &clock);
        assert!(limiter.check_and_consume(client()).is_allowed());
        assert!(limiter.check_and_consume(client()).is_allowed());
        // Hammering while denied must not extend or grow the window count.
        for _ in 0..10 {
            assert!(!limiter.check_and_consume(client()).is_allowed());
        }
        clock.advance_secs(3600);
        assert!(limiter.check_and_consume(client()).is_allowed());
    }

    #[test]
    fn window_expiry_resets_count() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(15, Duration::from_secs(3600), &clock);
        for _ in 0..15 {
            assert!(limiter.check_and_consume(client()).is_allowed());
        }
        assert!(!limiter.check_and_consume(client()).is_allowed());
        clock.advance_secs(3600);
        // First request of the new window is accepted and counted as 1.
        assert!(limiter.check_and_consume(client()).is_allowed());
        for _ in 0..14 {
            assert!(limiter.check_and_consume(client()).is_allowed());
        }
        assert!(!limiter.check_and_consume(client()).is_allowed());
    }

    #[test]
    fn clients_are_tracked_independently() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(1, Duration::from_secs(3600), &clock);
        let other: IpAddr = "198.51.100.9".parse().unwrap();
        assert!(limiter.check_and_consume(client()).is_allowed());
        assert!(!limiter.check_and_consume(client()).is_allowed());
        assert!(limiter.check_and_consume(other).is_allowed());
    }
}
