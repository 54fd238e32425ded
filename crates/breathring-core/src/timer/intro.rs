//! Intro pop played when a countdown starts.
//!
//! The overlay grows from 94% and fades in while the progress dot grows
//! from 85%, both over 600 ms with a quartic ease-out. Like the breath
//! relax, it runs on wall time and is sampled from the clock, so it settles
//! even if the countdown is paused straight away.

use std::time::{Duration, Instant};

use super::easing::power3_out;

pub const INTRO_DURATION: Duration = Duration::from_millis(600);
pub const OVERLAY_START_SCALE: f64 = 0.94;
pub const DOT_START_SCALE: f64 = 0.85;

#[derive(Debug, Clone, Copy, Default)]
pub struct IntroPop {
    started_at: Option<Instant>,
}

impl IntroPop {
    pub fn begin(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    /// Eased progress in `0.0 ..= 1.0`. Settled (1.0) before the first start.
    pub fn progress(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => {
                let t = now.saturating_duration_since(start).as_secs_f64()
                    / INTRO_DURATION.as_secs_f64();
                power3_out(t)
            }
            None => 1.0,
        }
    }

    pub fn overlay_scale(progress: f64) -> f64 {
        OVERLAY_START_SCALE + (1.0 - OVERLAY_START_SCALE) * progress
    }

    pub fn dot_scale(progress: f64) -> f64 {
        DOT_START_SCALE + (1.0 - DOT_START_SCALE) * progress
    }
}
