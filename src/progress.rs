//! Simulated generation progress.
//!
//! The image endpoint offers no progress feedback channel, so progress is
//! interpolated through fixed phases and jittered so the ramp does not look
//! robotic. The simulator caps itself below 100%; the final 100% comes from
//! the session once the payload has actually arrived.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Reporter tick interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Ceiling for simulated progress; 100 is reserved for confirmed success.
pub const SIMULATED_CEILING: u8 = 99;

/// Message attached to the final 100% update on success.
pub const COMPLETED_MESSAGE: &str = "Generation complete";

/// One segment of the simulated progress curve.
#[derive(Debug, Clone, Copy)]
pub struct Phase {
    /// Percentage reached when this phase ends.
    pub end_percent: f64,
    /// How long the phase takes to play out.
    pub duration: Duration,
    /// Status message shown while the phase runs.
    pub message: &'static str,
}

/// Fixed curve: a fast start, then three slower rendering phases.
pub const PHASES: [Phase; 4] = [
    Phase {
        end_percent: 30.0,
        duration: Duration::from_secs(2),
        message: "Composing the scene",
    },
    Phase {
        end_percent: 60.0,
        duration: Duration::from_secs(10),
        message: "Sketching outlines",
    },
    Phase {
        end_percent: 85.0,
        duration: Duration::from_secs(10),
        message: "Rendering light and shadow",
    },
    Phase {
        end_percent: 95.0,
        duration: Duration::from_secs(10),
        message: "Refining details",
    },
];

/// A displayed progress snapshot.
///
/// Carries explicit percent and message fields so consumers never have to
/// parse previously rendered text to decide what to show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Whole percent to display, at most 99 while simulating.
    pub percent: u8,
    /// Status message for the current phase.
    pub message: &'static str,
}

impl ProgressUpdate {
    /// The final snapshot for a confirmed success.
    pub const fn completed() -> Self {
        Self {
            percent: 100,
            message: COMPLETED_MESSAGE,
        }
    }
}

/// Phase-based progress interpolator.
///
/// Clock-parameterized: callers pass `now` into [`tick`](Self::tick), so the
/// machine is deterministic under test. It never terminates on its own; the
/// session cancels the reporter driving it when the attempt resolves.
pub struct ProgressSimulator {
    phase: usize,
    phase_started: Instant,
    phase_base: f64,
    progress: f64,
    rng: StdRng,
}

impl ProgressSimulator {
    /// Starts a fresh simulation at phase 0, progress 0.
    pub fn new(now: Instant) -> Self {
        Self::with_rng(now, StdRng::from_entropy())
    }

    /// Starts a fresh simulation with a caller-provided RNG.
    pub fn with_rng(now: Instant, rng: StdRng) -> Self {
        Self {
            phase: 0,
            phase_started: now,
            phase_base: 0.0,
            progress: 0.0,
            rng,
        }
    }

    /// Advances the simulation to `now` and returns the snapshot to display.
    ///
    /// Within a phase, progress interpolates linearly from the phase's start
    /// value to its end percent, plus a small positive jitter (uniform up to
    /// 0.5, applied half the time). Once a phase's duration has elapsed,
    /// progress snaps to the phase end and the machine advances, saturating
    /// at the last phase.
    pub fn tick(&mut self, now: Instant) -> ProgressUpdate {
        let phase = &PHASES[self.phase];
        let elapsed = now.saturating_duration_since(self.phase_started);
        let fraction = elapsed.as_secs_f64() / phase.duration.as_secs_f64();

        if fraction >= 1.0 {
            self.progress = self.progress.max(phase.end_percent);
            if self.phase + 1 < PHASES.len() {
                self.phase += 1;
                self.phase_started = now;
                self.phase_base = self.progress;
            }
        } else {
            let target = self.phase_base + (phase.end_percent - self.phase_base) * fraction;
            let jitter = if self.rng.gen_bool(0.5) {
                self.rng.gen_range(0.0..0.5)
            } else {
                0.0
            };
            // max() keeps the displayed value non-decreasing across ticks.
            self.progress = self.progress.max(target + jitter);
        }

        self.snapshot()
    }

    /// The current snapshot without advancing the simulation.
    pub fn snapshot(&self) -> ProgressUpdate {
        ProgressUpdate {
            percent: self.progress.min(SIMULATED_CEILING as f64).floor() as u8,
            message: PHASES[self.phase].message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator(start: Instant) -> ProgressSimulator {
        ProgressSimulator::with_rng(start, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_starts_at_zero_with_first_message() {
        let start = Instant::now();
        let sim = simulator(start);
        let update = sim.snapshot();
        assert_eq!(update.percent, 0);
        assert_eq!(update.message, PHASES[0].message);
    }

    #[test]
    fn test_progress_is_monotonic_and_capped() {
        let start = Instant::now();
        let mut sim = simulator(start);
        let mut last = 0;
        for tick in 1..=450u32 {
            let update = sim.tick(start + TICK_INTERVAL * tick);
            assert!(update.percent >= last, "decreased at tick {tick}");
            assert!(update.percent <= SIMULATED_CEILING, "exceeded cap at tick {tick}");
            last = update.percent;
        }
    }

    #[test]
    fn test_phase_messages_advance_in_order() {
        let start = Instant::now();
        let mut sim = simulator(start);
        let mut seen = vec![sim.snapshot().message];
        for tick in 1..=450u32 {
            let update = sim.tick(start + TICK_INTERVAL * tick);
            if seen.last() != Some(&update.message) {
                seen.push(update.message);
            }
        }
        let expected: Vec<_> = PHASES.iter().map(|phase| phase.message).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_phase_boundary_snaps_to_end_percent() {
        let start = Instant::now();
        let mut sim = simulator(start);
        let update = sim.tick(start + PHASES[0].duration);
        assert_eq!(update.percent, PHASES[0].end_percent as u8);
        assert_eq!(update.message, PHASES[1].message);
    }

    #[test]
    fn test_saturates_at_last_phase() {
        let start = Instant::now();
        let mut sim = simulator(start);
        // Run well past the sum of all phase durations.
        let mut update = sim.snapshot();
        for tick in 1..=600u32 {
            update = sim.tick(start + TICK_INTERVAL * tick);
        }
        assert_eq!(update.message, PHASES.last().unwrap().message);
        assert!(update.percent >= 95);
        assert!(update.percent <= SIMULATED_CEILING);
    }

    #[test]
    fn test_interpolates_within_a_phase() {
        let start = Instant::now();
        let mut sim = simulator(start);
        // Halfway through phase 0: roughly half of its end percent.
        let update = sim.tick(start + PHASES[0].duration / 2);
        assert!(update.percent >= 14 && update.percent <= 16, "{}", update.percent);
    }

    #[test]
    fn test_completed_snapshot() {
        let update = ProgressUpdate::completed();
        assert_eq!(update.percent, 100);
        assert_eq!(update.message, COMPLETED_MESSAGE);
    }
}
