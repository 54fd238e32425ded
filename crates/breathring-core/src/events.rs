use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::{BreathDirection, TimerState};

/// Every state change of the timer produces an Event.
/// The adapter renders them; completion observers receive the final one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session_id: Uuid,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session_id: Uuid,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        session_id: Uuid,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// Countdown abandoned and reset to the initial state.
    TimerStopped {
        session_id: Uuid,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        session_id: Uuid,
        total_ms: u64,
        laps: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn session_id(&self) -> Uuid {
        match self {
            Event::TimerStarted { session_id, .. }
            | Event::TimerPaused { session_id, .. }
            | Event::TimerResumed { session_id, .. }
            | Event::TimerStopped { session_id, .. }
            | Event::TimerCompleted { session_id, .. } => *session_id,
        }
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub state: TimerState,
    pub elapsed_ms: u64,
    pub total_ms: u64,
    pub fraction_of_total: f64,
    pub angle_deg: f64,
    pub normalized_angle_deg: f64,
    pub cycle_progress: f64,
    pub lap_index: u64,
    pub is_erasing_lap: bool,
    pub dot_x: f64,
    pub dot_y: f64,
    /// Trail stroke dash: visible length, gap length.
    pub dash_array: [f64; 2],
    pub dash_offset: f64,
    pub breath_radius: f64,
    pub breath_direction: Option<BreathDirection>,
    pub formatted_elapsed: String,
    pub formatted_remaining: String,
    /// The whole-second display changed since the previous frame.
    pub second_changed: bool,
    /// Eased progress of the start pop; 1.0 once settled.
    pub intro_progress: f64,
    pub overlay_scale: f64,
    pub overlay_opacity: f64,
    pub dot_scale: f64,
}
