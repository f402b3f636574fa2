//! Wall-clock access and remaining-time computation.
//!
//! The countdown never decrements a stored value on each tick. It fixes an
//! [`Anchor`] once, then re-derives the remaining time from the live clock on
//! every recomputation, so delayed tick delivery (a suspended terminal, a slow
//! host update loop) cannot accumulate drift.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies "now" as whole epoch seconds.
///
/// Production code uses [`SystemClock`]; tests drive a [`ManualClock`] to get
/// deterministic tick arithmetic.
pub trait TimeSource: Send + Sync + fmt::Debug {
    /// Current wall-clock time in seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// [`TimeSource`] backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Hand-driven [`TimeSource`] for tests and demos.
///
/// Cloning shares the underlying instant, so a clock handed to a countdown
/// model can still be advanced from the outside.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::clock::{ManualClock, TimeSource};
///
/// let clock = ManualClock::new(1_000);
/// let handle = clock.clone();
/// handle.advance(5);
/// assert_eq!(clock.now(), 1_005);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    instant: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock frozen at the given epoch second.
    pub fn new(now: i64) -> Self {
        Self {
            instant: Arc::new(AtomicI64::new(now)),
        }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: i64) {
        self.instant.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute epoch second.
    pub fn set(&self, now: i64) {
        self.instant.store(now, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> i64 {
        self.instant.load(Ordering::SeqCst)
    }
}

/// The fixed wall-clock reference point a countdown is measured against.
///
/// Chosen once when the model is built and immutable for the life of the
/// instance; a reset or loop re-arm replaces the whole anchor rather than
/// mutating it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Relative mode: the countdown ends at this epoch second, computed as
    /// `now + seconds_left` when the timer was started.
    Relative {
        /// Epoch second at which the countdown reaches zero.
        end_time: i64,
    },
    /// Absolute mode: the countdown ends at a caller-supplied instant.
    Absolute {
        /// Target epoch second.
        target: i64,
    },
}

impl Anchor {
    /// Seconds left until the anchor, clamped to zero once crossed.
    ///
    /// A timer resumed long after its deadline therefore reads 0 and
    /// completes on its next tick instead of reporting a negative value.
    pub fn remaining(&self, now: i64) -> i64 {
        let end = match *self {
            Anchor::Relative { end_time } => end_time,
            Anchor::Absolute { target } => target,
        };
        (end - now).max(0)
    }

    /// Whether this anchor was built from an absolute target instant.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Anchor::Absolute { .. })
    }
}
