pub mod config;
pub mod run;
pub mod simulate;

use std::io::Write;
use std::path::Path;

use breathring_core::timer::format_mmss;
use breathring_core::{Config, Event, FrameSnapshot, Result, TimerState};
use clap::Args;
use serde::Serialize;

/// Overrides for the `[timer]` section of the configuration.
#[derive(Args, Debug, Default)]
pub struct TimerArgs {
    /// Countdown length in seconds
    #[arg(long)]
    pub duration_secs: Option<u64>,
    /// Inhale (expanding) leg in seconds
    #[arg(long)]
    pub inhale_secs: Option<f64>,
    /// Exhale (contracting) leg in seconds
    #[arg(long)]
    pub exhale_secs: Option<f64>,
    /// Smallest breath radius as a fraction of the ring radius
    #[arg(long)]
    pub min_ratio: Option<f64>,
    /// Largest breath radius as a fraction of the ring radius
    #[arg(long)]
    pub max_ratio: Option<f64>,
}

impl TimerArgs {
    /// Load the configuration and apply command-line overrides on top.
    pub fn resolve(&self, config_path: Option<&Path>) -> Result<Config> {
        let mut config = load_config(config_path)?;
        if let Some(secs) = self.duration_secs {
            config.timer.total_duration_ms = secs.saturating_mul(1000);
        }
        if let Some(secs) = self.inhale_secs {
            config.timer.inhale_ms = secs_to_ms(secs);
        }
        if let Some(secs) = self.exhale_secs {
            config.timer.exhale_ms = secs_to_ms(secs);
        }
        if let Some(ratio) = self.min_ratio {
            config.timer.min_radius_ratio = ratio;
        }
        if let Some(ratio) = self.max_ratio {
            config.timer.max_radius_ratio = ratio;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Negative and NaN inputs become zero and are rejected by validation.
fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub final_state: TimerState,
    pub frames: u64,
    pub completions: u64,
    pub elapsed_ms: u64,
    pub wall_ms: u64,
}

/// One line of JSON output. Events carry their own `type` tag.
#[derive(Serialize)]
#[serde(untagged)]
pub enum OutputLine<'a> {
    Event(&'a Event),
    Tagged(Tagged<'a>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tagged<'a> {
    Frame(&'a FrameSnapshot),
    Summary(&'a Summary),
}

pub fn write_json_line(out: &mut impl Write, line: &OutputLine<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    writeln!(out)?;
    Ok(())
}

/// Human-readable one-liner for a state change.
pub fn describe(event: &Event) -> String {
    match event {
        Event::TimerStarted { total_ms, .. } => {
            format!("started {} countdown", format_mmss(total_ms / 1000))
        }
        Event::TimerPaused { elapsed_ms, .. } => format!("paused at {}", format_mmss(elapsed_ms / 1000)),
        Event::TimerResumed { elapsed_ms, .. } => format!("resumed at {}", format_mmss(elapsed_ms / 1000)),
        Event::TimerStopped { elapsed_ms, .. } => format!("stopped at {}", format_mmss(elapsed_ms / 1000)),
        Event::TimerCompleted { laps, .. } => format!("complete after {laps} laps"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_to_ms_rounds_and_saturates() {
        assert_eq!(secs_to_ms(2.5), 2500);
        assert_eq!(secs_to_ms(0.0004), 0);
        assert_eq!(secs_to_ms(-3.0), 0);
        assert_eq!(secs_to_ms(f64::NAN), 0);
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\ninhale_ms = 4000\n").unwrap();

        let args = TimerArgs {
            duration_secs: Some(90),
            exhale_secs: Some(6.0),
            ..TimerArgs::default()
        };
        let config = args.resolve(Some(&path)).unwrap();
        assert_eq!(config.timer.total_duration_ms, 90_000);
        assert_eq!(config.timer.inhale_ms, 4000);
        assert_eq!(config.timer.exhale_ms, 6000);
        assert_eq!(format_mmss(config.timer.total_duration_ms / 1000), "01:30");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let args = TimerArgs {
            min_ratio: Some(0.95),
            ..TimerArgs::default()
        };
        assert!(args.resolve(Some(&path)).is_err());
    }

    #[test]
    fn summary_line_is_tagged() {
        let summary = Summary {
            final_state: TimerState::Complete,
            frames: 3,
            completions: 1,
            elapsed_ms: 1000,
            wall_ms: 1000,
        };
        let mut buf = Vec::new();
        write_json_line(&mut buf, &OutputLine::Tagged(Tagged::Summary(&summary))).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["type"], "summary");
        assert_eq!(json["final_state"], "complete");
    }
}
