//! Timer engine implementation.
//!
//! The timer engine is a monotonic-clock-based state machine. It does not use
//! internal threads - the caller delivers animation frames by calling
//! `tick()`, and the engine only does work when it has armed a frame.
//!
//! ## State Transitions
//!
//! ```text
//! Initial -> Running <-> Paused
//!               |          |
//!               v          |
//!           Complete       +--(stop)--> Initial
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Config::default(), MonotonicClock)?;
//! engine.on_frame(|frame| draw(frame));
//! engine.start();
//! // Once per display refresh:
//! engine.tick(); // Returns Some(Event::TimerCompleted) when the countdown ends
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use uuid::Uuid;

use super::accumulator::ElapsedAccumulator;
use super::breath::{BreathPulse, BreathShape};
use super::display::{elapsed_secs, format_mmss, remaining_secs};
use super::frame::FrameScheduler;
use super::geometry::{ProgressGeometry, ProgressSample, RingGeometry};
use super::intro::IntroPop;
use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::error::ConfigError;
use crate::events::{Event, FrameSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Never started, or stopped.
    Initial,
    Running,
    Paused,
    /// Countdown reached its total. Terminal until started again.
    Complete,
}

/// One countdown run.
#[derive(Debug, Clone)]
struct Session {
    id: Uuid,
    accumulator: ElapsedAccumulator,
}

impl Session {
    fn new(total: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            accumulator: ElapsedAccumulator::new(total),
        }
    }
}

type FrameObserver = Box<dyn FnMut(&FrameSnapshot)>;
type CompleteObserver = Box<dyn FnMut(&Event)>;

/// Countdown ring controller.
///
/// Owns the session, the breath pulse and the frame loop for one countdown
/// at a time.
pub struct TimerEngine<C: Clock = MonotonicClock> {
    config: Config,
    clock: C,
    state: TimerState,
    session: Session,
    geometry: ProgressGeometry,
    ring: RingGeometry,
    breath: BreathPulse,
    intro: IntroPop,
    frames: FrameScheduler,
    /// Active elapsed time seen by the previous frame; the difference feeds
    /// the breath pulse.
    last_elapsed: Duration,
    lap_index: u64,
    last_whole_sec: u64,
    frame_observers: Vec<FrameObserver>,
    complete_observers: Vec<CompleteObserver>,
}

impl<C: Clock> TimerEngine<C> {
    /// Create an engine in the `Initial` state.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configuration is out of
    /// range; such an engine never exists.
    pub fn new(config: Config, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let ring = RingGeometry::new(&config.ring);
        let shape = BreathShape::new(
            ring.radius() * config.timer.min_radius_ratio,
            ring.radius() * config.timer.max_radius_ratio,
            config.timer.inhale(),
            config.timer.exhale(),
        );

        Ok(Self {
            session: Session::new(config.timer.total_duration()),
            geometry: ProgressGeometry::new(config.timer.deg_per_second),
            breath: BreathPulse::new(shape),
            intro: IntroPop::default(),
            ring,
            config,
            clock,
            state: TimerState::Initial,
            frames: FrameScheduler::new(),
            last_elapsed: Duration::ZERO,
            lap_index: 0,
            last_whole_sec: 0,
            frame_observers: Vec::new(),
            complete_observers: Vec::new(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    pub fn total(&self) -> Duration {
        self.session.accumulator.total()
    }

    /// Active elapsed time right now.
    pub fn elapsed(&self) -> Duration {
        self.session.accumulator.sample(self.clock.now())
    }

    /// Elapsed time frozen at the last pause, stop or completion.
    pub fn accumulated_elapsed(&self) -> Duration {
        self.session.accumulator.accumulated()
    }

    /// Lap seen by the most recent frame.
    pub fn lap_index(&self) -> u64 {
        self.lap_index
    }

    /// Whether a frame is armed; `tick()` is a no-op otherwise.
    pub fn frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    pub fn breath(&self) -> &BreathPulse {
        &self.breath
    }

    pub fn breath_radius(&self) -> f64 {
        self.breath.radius(self.clock.now())
    }

    pub fn ring(&self) -> &RingGeometry {
        &self.ring
    }

    /// Current frame without advancing anything.
    pub fn snapshot(&self) -> FrameSnapshot {
        let now = self.clock.now();
        let elapsed = self.session.accumulator.sample(now);
        let sample = self.geometry.sample(elapsed, self.total());
        self.build_frame(&sample, now, false)
    }

    // ── Observers ────────────────────────────────────────────────────

    /// Called once per delivered frame, after sampling and geometry.
    pub fn on_frame<F>(&mut self, observer: F)
    where
        F: FnMut(&FrameSnapshot) + 'static,
    {
        self.frame_observers.push(Box::new(observer));
    }

    /// Called exactly once per countdown that runs to its end.
    pub fn on_complete<F>(&mut self, observer: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.complete_observers.push(Box::new(observer));
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Initial | TimerState::Complete => {
                let now = self.clock.now();
                self.session = Session::new(self.config.timer.total_duration());
                self.session.accumulator.begin(now);
                self.reset_progress();
                self.intro.begin(now);
                if self.breath.ensure(now) {
                    debug!(radius = self.breath.radius(now), "breath cycle created");
                }
                self.state = TimerState::Running;
                self.frames.request();

                info!(
                    session_id = %self.session.id,
                    total_ms = self.config.timer.total_duration_ms,
                    "timer started"
                );
                Some(Event::TimerStarted {
                    session_id: self.session.id,
                    total_ms: self.config.timer.total_duration_ms,
                    at: Utc::now(),
                })
            }
            TimerState::Running | TimerState::Paused => {
                debug!(state = ?self.state, "start ignored");
                None
            }
        }
    }

    pub fn pause_or_resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => Some(self.pause()),
            TimerState::Paused => Some(self.resume()),
            TimerState::Initial | TimerState::Complete => {
                debug!(state = ?self.state, "pause/resume ignored");
                None
            }
        }
    }

    pub fn stop(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                let now = self.clock.now();
                let elapsed = self.session.accumulator.sample(now);
                self.frames.cancel();
                self.session.accumulator.reset();
                self.breath.destroy(now);
                self.reset_progress();
                self.state = TimerState::Initial;

                info!(
                    session_id = %self.session.id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "timer stopped"
                );
                Some(Event::TimerStopped {
                    session_id: self.session.id,
                    elapsed_ms: elapsed.as_millis() as u64,
                    at: Utc::now(),
                })
            }
            TimerState::Initial | TimerState::Complete => {
                debug!(state = ?self.state, "stop ignored");
                None
            }
        }
    }

    /// Deliver one animation frame.
    ///
    /// Samples the clock, updates geometry and breath, notifies frame
    /// observers and re-arms the next frame. Returns
    /// `Some(Event::TimerCompleted)` on the frame that reaches the total.
    pub fn tick(&mut self) -> Option<Event> {
        self.frames.take()?;
        if self.state != TimerState::Running {
            return None;
        }

        let now = self.clock.now();
        let total = self.total();
        let elapsed = self.session.accumulator.sample(now);

        self.breath.advance(elapsed.saturating_sub(self.last_elapsed));
        self.last_elapsed = elapsed;

        let sample = self.geometry.sample(elapsed, total);
        if sample.lap_index != self.lap_index {
            self.lap_index = sample.lap_index;
            debug!(
                lap = sample.lap_index,
                erasing = sample.is_erasing_lap,
                "lap boundary"
            );
        }

        let whole_sec = elapsed_secs(elapsed);
        let second_changed = whole_sec != self.last_whole_sec;
        self.last_whole_sec = whole_sec;

        let completed = elapsed >= total;
        if completed {
            self.state = TimerState::Complete;
            self.session.accumulator.complete();
            self.breath.destroy(now);
        } else {
            self.frames.request();
        }

        let frame = self.build_frame(&sample, now, second_changed);
        trace!(
            elapsed_ms = frame.elapsed_ms,
            angle = frame.normalized_angle_deg,
            breath = frame.breath_radius,
            "frame"
        );
        for observer in &mut self.frame_observers {
            observer(&frame);
        }

        if !completed {
            return None;
        }

        let event = Event::TimerCompleted {
            session_id: self.session.id,
            total_ms: self.config.timer.total_duration_ms,
            laps: sample.lap_index,
            at: Utc::now(),
        };
        info!(session_id = %self.session.id, laps = sample.lap_index, "timer completed");
        for observer in &mut self.complete_observers {
            observer(&event);
        }
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn pause(&mut self) -> Event {
        let now = self.clock.now();
        let elapsed = self.session.accumulator.freeze(now);
        self.frames.cancel();
        self.breath.suspend();
        self.state = TimerState::Paused;

        debug!(elapsed_ms = elapsed.as_millis() as u64, "timer paused");
        Event::TimerPaused {
            session_id: self.session.id,
            elapsed_ms: elapsed.as_millis() as u64,
            at: Utc::now(),
        }
    }

    fn resume(&mut self) -> Event {
        let now = self.clock.now();
        self.session.accumulator.begin(now);
        self.breath.resume();
        self.state = TimerState::Running;
        self.frames.request();

        let elapsed_ms = self.session.accumulator.accumulated().as_millis() as u64;
        debug!(elapsed_ms, "timer resumed");
        Event::TimerResumed {
            session_id: self.session.id,
            elapsed_ms,
            at: Utc::now(),
        }
    }

    fn reset_progress(&mut self) {
        self.last_elapsed = Duration::ZERO;
        self.lap_index = 0;
        self.last_whole_sec = 0;
    }

    fn build_frame(
        &self,
        sample: &ProgressSample,
        now: Instant,
        second_changed: bool,
    ) -> FrameSnapshot {
        let (dot_x, dot_y) = self.ring.dot_position(sample);
        let dash = self.ring.stroke_dash(sample);
        let elapsed = Duration::from_millis(sample.elapsed_ms);
        let intro_progress = self.intro.progress(now);

        FrameSnapshot {
            state: self.state,
            elapsed_ms: sample.elapsed_ms,
            total_ms: self.config.timer.total_duration_ms,
            fraction_of_total: sample.fraction_of_total,
            angle_deg: sample.angle_deg,
            normalized_angle_deg: sample.normalized_angle_deg,
            cycle_progress: sample.cycle_progress,
            lap_index: sample.lap_index,
            is_erasing_lap: sample.is_erasing_lap,
            dot_x,
            dot_y,
            dash_array: dash.array,
            dash_offset: dash.offset,
            breath_radius: self.breath.radius(now),
            breath_direction: self.breath.direction(),
            formatted_elapsed: format_mmss(elapsed_secs(elapsed)),
            formatted_remaining: format_mmss(remaining_secs(elapsed, self.total())),
            second_changed,
            intro_progress,
            overlay_scale: IntroPop::overlay_scale(intro_progress),
            overlay_opacity: intro_progress,
            dot_scale: IntroPop::dot_scale(intro_progress),
        }
    }
}

impl<C: Clock> fmt::Debug for TimerEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("lap_index", &self.lap_index)
            .field("breath", &self.breath)
            .field("frame_pending", &self.frames.is_pending())
            .finish_non_exhaustive()
    }
}
