//! Simulation time model: tick counter and budget clocks.
//!
//! # Design
//!
//! Simulation progress is a monotonically increasing [`Tick`] counter.  The
//! per-tick compute budget, in contrast, is measured in *wall-clock* time:
//! the scheduler stops visiting agents once the elapsed real time since tick
//! start exceeds [`SimConfig::tick_budget`].
//!
//! Wall-clock reads go through the [`TickClock`] trait so the budget logic is
//! testable: production code uses [`MonotonicClock`] (an `Instant` origin),
//! tests use [`ManualClock`] and advance it by hand.

use std::fmt;
use std::time::{Duration, Instant};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at 10 ticks per second a u64 lasts ~58 billion years,
/// so overflow is not a practical concern.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Advance in place by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.0 += 1;
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Source of monotonic elapsed time for budget accounting.
///
/// `elapsed` takes `&mut self` so test clocks may auto-advance per read.
/// Implementations must be monotonic: successive reads never decrease.
pub trait TickClock {
    /// Time elapsed since some fixed origin (clock creation).
    fn elapsed(&mut self) -> Duration;
}

/// Production clock backed by [`Instant`].
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock for MonotonicClock {
    #[inline]
    fn elapsed(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Each `elapsed` read returns the current value, then advances it by
/// `step_per_read` — so a test can model "every agent visit costs X" without
/// touching real time.  Set `step_per_read` to zero for a frozen clock and
/// use [`advance`](ManualClock::advance) explicitly.
pub struct ManualClock {
    pub now: Duration,
    pub step_per_read: Duration,
}

impl ManualClock {
    pub fn frozen() -> Self {
        Self { now: Duration::ZERO, step_per_read: Duration::ZERO }
    }

    pub fn stepping(step_per_read: Duration) -> Self {
        Self { now: Duration::ZERO, step_per_read }
    }

    /// Move the clock forward explicitly.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl TickClock for ManualClock {
    fn elapsed(&mut self) -> Duration {
        let t = self.now;
        self.now += self.step_per_read;
        t
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically constructed in the application crate (optionally from a TOML or
/// JSON file via the `serde` feature) and handed to the sim builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical agent
    /// decisions (wall-clock budgeting still varies which agents run when).
    pub seed: u64,

    /// Wall-clock compute budget per tick.  Agents not reached within the
    /// budget wait for the next tick.
    pub tick_budget: Duration,

    /// Simulated seconds advanced per agent update (integration step).
    pub step_secs: f32,

    /// Node-count cap handed to the router on automatic replans.  `None`
    /// searches exhaustively; large graphs want a bound.
    pub route_node_cap: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:           0,
            tick_budget:    Duration::from_millis(2),
            step_secs:      0.1,
            route_node_cap: None,
        }
    }
}
