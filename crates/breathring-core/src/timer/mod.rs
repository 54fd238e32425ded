mod accumulator;
mod breath;
mod display;
mod easing;
mod engine;
mod frame;
mod geometry;
mod intro;

pub use accumulator::ElapsedAccumulator;
pub use breath::{
    BreathCycle, BreathDirection, BreathPulse, BreathShape, MIN_LEG_DURATION, RELAX_DURATION,
};
pub use display::{elapsed_secs, format_mmss, remaining_secs};
pub use easing::{power1_in_out, power1_in_out_inverse, power2_out, power3_out};
pub use engine::{TimerEngine, TimerState};
pub use frame::{FrameRequest, FrameScheduler};
pub use geometry::{
    ProgressGeometry, ProgressSample, RingGeometry, StrokeDash, START_ANGLE_DEG,
};
pub use intro::{IntroPop, DOT_START_SCALE, INTRO_DURATION, OVERLAY_START_SCALE};
