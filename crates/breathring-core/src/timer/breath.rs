//! Breath pulse oscillator.
//!
//! The guide circle breathes between a minimum and maximum radius: an
//! inhale leg expands it, an exhale leg contracts it, and the two repeat for
//! as long as the countdown runs. The phase is an explicit value
//! ([`BreathCycle`]) advanced by active-time deltas, so pausing simply stops
//! feeding it time and resuming continues mid-leg from the exact radius it
//! held.
//!
//! When the countdown stops or completes the cycle is dropped and the radius
//! eases to a neutral rest value instead of snapping.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::easing::{power1_in_out, power1_in_out_inverse, power2_out};

/// Shortest allowed inhale or exhale leg.
pub const MIN_LEG_DURATION: Duration = Duration::from_millis(100);

/// How long the radius takes to settle after the cycle is destroyed.
pub const RELAX_DURATION: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathDirection {
    /// Inhale, growing toward the maximum radius.
    Expanding,
    /// Exhale, shrinking toward the minimum radius.
    Contracting,
}

impl BreathDirection {
    fn flip(self) -> Self {
        match self {
            BreathDirection::Expanding => BreathDirection::Contracting,
            BreathDirection::Contracting => BreathDirection::Expanding,
        }
    }
}

/// Radius range and cadence of the oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathShape {
    pub min_radius: f64,
    pub max_radius: f64,
    pub inhale: Duration,
    pub exhale: Duration,
}

impl BreathShape {
    pub fn new(min_radius: f64, max_radius: f64, inhale: Duration, exhale: Duration) -> Self {
        Self {
            min_radius,
            max_radius,
            inhale: inhale.max(MIN_LEG_DURATION),
            exhale: exhale.max(MIN_LEG_DURATION),
        }
    }

    pub fn span(&self) -> f64 {
        self.max_radius - self.min_radius
    }

    /// Midpoint the radius relaxes to when the cycle is destroyed.
    pub fn rest_radius(&self) -> f64 {
        (self.min_radius + self.max_radius) / 2.0
    }

    pub fn leg_duration(&self, direction: BreathDirection) -> Duration {
        match direction {
            BreathDirection::Expanding => self.inhale,
            BreathDirection::Contracting => self.exhale,
        }
    }

    pub fn period(&self) -> Duration {
        self.inhale.saturating_add(self.exhale)
    }
}

/// `Duration::from_nanos` takes a `u64`, which only spans ~584 years.
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

/// Phase of a running breath: which leg it is on and how far into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathCycle {
    direction: BreathDirection,
    leg_elapsed: Duration,
}

impl BreathCycle {
    /// Place a new cycle so that it starts exactly at `radius`.
    ///
    /// If the radius is closer to the maximum the cycle exhales first,
    /// otherwise it inhales first.
    pub fn starting_at(shape: &BreathShape, radius: f64) -> Self {
        let radius = radius.clamp(shape.min_radius, shape.max_radius);
        let dist_to_max = (shape.max_radius - radius).abs();
        let dist_to_min = (radius - shape.min_radius).abs();

        let (direction, covered) = if dist_to_max < dist_to_min {
            (BreathDirection::Contracting, dist_to_max / shape.span())
        } else {
            (BreathDirection::Expanding, dist_to_min / shape.span())
        };

        let leg = shape.leg_duration(direction);
        Self {
            direction,
            leg_elapsed: leg.mul_f64(power1_in_out_inverse(covered)),
        }
    }

    pub fn direction(&self) -> BreathDirection {
        self.direction
    }

    pub fn radius(&self, shape: &BreathShape) -> f64 {
        let leg = shape.leg_duration(self.direction);
        let eased = power1_in_out(self.leg_elapsed.as_secs_f64() / leg.as_secs_f64());
        match self.direction {
            BreathDirection::Expanding => shape.min_radius + shape.span() * eased,
            BreathDirection::Contracting => shape.max_radius - shape.span() * eased,
        }
    }

    pub fn advance(&mut self, shape: &BreathShape, dt: Duration) {
        let mut remaining = self.leg_elapsed.saturating_add(dt);

        // Whole inhale+exhale periods leave the phase unchanged.
        let period = shape.period().as_nanos();
        if remaining.as_nanos() >= period {
            remaining = duration_from_nanos(remaining.as_nanos() % period);
        }

        loop {
            let leg = shape.leg_duration(self.direction);
            if remaining < leg {
                break;
            }
            remaining -= leg;
            self.direction = self.direction.flip();
        }
        self.leg_elapsed = remaining;
    }
}

#[derive(Debug, Clone, Copy)]
struct Relax {
    from: f64,
    to: f64,
    started_at: Instant,
}

impl Relax {
    fn radius(&self, now: Instant) -> f64 {
        let t = now.saturating_duration_since(self.started_at).as_secs_f64()
            / RELAX_DURATION.as_secs_f64();
        self.from + (self.to - self.from) * power2_out(t)
    }
}

/// Owner of the optional breath cycle and its rest animation.
#[derive(Debug, Clone)]
pub struct BreathPulse {
    shape: BreathShape,
    cycle: Option<BreathCycle>,
    suspended: bool,
    relax: Option<Relax>,
    resting_radius: f64,
}

impl BreathPulse {
    pub fn new(shape: BreathShape) -> Self {
        Self {
            resting_radius: shape.min_radius,
            shape,
            cycle: None,
            suspended: false,
            relax: None,
        }
    }

    pub fn shape(&self) -> &BreathShape {
        &self.shape
    }

    pub fn is_active(&self) -> bool {
        self.cycle.is_some()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn direction(&self) -> Option<BreathDirection> {
        self.cycle.map(|c| c.direction())
    }

    /// Create the cycle if there is none, starting from the radius currently
    /// shown. An existing cycle is left untouched. Returns `true` if a cycle
    /// was created.
    pub fn ensure(&mut self, now: Instant) -> bool {
        if self.cycle.is_some() {
            return false;
        }
        let radius = self.radius(now);
        self.relax = None;
        self.suspended = false;
        self.cycle = Some(BreathCycle::starting_at(&self.shape, radius));
        true
    }

    pub fn suspend(&mut self) {
        if self.cycle.is_some() {
            self.suspended = true;
        }
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Feed active time into the cycle. Ignored while suspended.
    pub fn advance(&mut self, dt: Duration) {
        if self.suspended {
            return;
        }
        if let Some(cycle) = self.cycle.as_mut() {
            cycle.advance(&self.shape, dt);
        }
    }

    /// Drop the cycle and ease the radius to rest.
    pub fn destroy(&mut self, now: Instant) {
        let Some(cycle) = self.cycle.take() else {
            return;
        };
        let rest = self.shape.rest_radius();
        self.relax = Some(Relax {
            from: cycle.radius(&self.shape),
            to: rest,
            started_at: now,
        });
        self.resting_radius = rest;
        self.suspended = false;
    }

    /// Radius to draw at `now`.
    pub fn radius(&self, now: Instant) -> f64 {
        if let Some(cycle) = &self.cycle {
            return cycle.radius(&self.shape);
        }
        match &self.relax {
            Some(relax) => relax.radius(now),
            None => self.resting_radius,
        }
    }
}
