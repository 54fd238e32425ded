//! # Breathring Core Library
//!
//! This library provides the countdown ring and breath-guidance controller
//! behind the Breathring timer. Rendering is left to the caller: the engine
//! produces normalized progress, angles, lap and erase flags, stroke dash
//! values and a breath radius once per frame, and a presentation layer draws
//! them.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A monotonic-clock-based state machine that requires the
//!   caller to invoke `tick()` once per animation frame
//! - **Geometry**: Pure mapping from active elapsed time to ring position and
//!   alternating draw/erase laps
//! - **Breath Pulse**: Phase-preserving inhale/exhale oscillator that survives
//!   pause and resume
//! - **Config**: TOML-based configuration with validation
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`FrameSnapshot`]: Per-frame output for the presentation layer
//! - [`Config`]: Application configuration
//! - [`Clock`]: Monotonic time source

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{Config, RingConfig, TimerConfig};
pub use error::{ConfigError, CoreError, Result};
pub use events::{Event, FrameSnapshot};
pub use timer::{BreathDirection, TimerEngine, TimerState};
