//! Real-time countdown in the terminal.
//!
//! The engine is driven from this thread at a fixed frame rate. A helper
//! thread reads stdin and forwards commands over a channel; it never touches
//! the engine.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use breathring_core::{Event, FrameSnapshot, MonotonicClock, Result, TimerEngine, TimerState};
use clap::Args;
use tracing::debug;

use super::{describe, write_json_line, OutputLine, Tagged, TimerArgs};

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub timer: TimerArgs,
    /// Frames per second to deliver to the engine
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,
    /// Emit JSON lines instead of a status line
    #[arg(long)]
    pub json: bool,
}

/// Keyboard commands, one per line on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    PauseResume,
    Stop,
    Start,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" | "pause" | "resume" => Some(Command::PauseResume),
            "s" | "stop" => Some(Command::Stop),
            "r" | "start" => Some(Command::Start),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

fn spawn_input() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(cmd) = Command::parse(&line) {
                if tx.send(cmd).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

struct Renderer<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> Renderer<W> {
    /// A state change. Text mode logs it and redraws the status line from
    /// `current`, so pauses, stops and fresh starts show up immediately.
    fn event(&mut self, event: &Event, current: &FrameSnapshot) -> Result<()> {
        if self.json {
            return write_json_line(&mut self.out, &OutputLine::Event(event));
        }
        writeln!(self.out, "\n{}", describe(event))?;
        self.status(current)
    }

    fn frame(&mut self, frame: &FrameSnapshot) -> Result<()> {
        if self.json {
            return write_json_line(&mut self.out, &OutputLine::Tagged(Tagged::Frame(frame)));
        }
        // Between events the status line only changes with the displayed second.
        if !frame.second_changed {
            return Ok(());
        }
        self.status(frame)
    }

    fn status(&mut self, frame: &FrameSnapshot) -> Result<()> {
        write!(
            self.out,
            "\r{} left  lap {} ({})  breath {:5.1}  [{}]",
            frame.formatted_remaining,
            frame.lap_index + 1,
            if frame.is_erasing_lap { "erase" } else { "draw" },
            frame.breath_radius,
            state_label(frame.state),
        )?;
        self.out.flush()?;
        Ok(())
    }
}

fn state_label(state: TimerState) -> &'static str {
    match state {
        TimerState::Initial => "stopped",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
        TimerState::Complete => "done",
    }
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = args.timer.resolve(config_path)?;
    let mut engine = TimerEngine::new(config, MonotonicClock)?;

    let latest: Rc<RefCell<Option<FrameSnapshot>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&latest);
    engine.on_frame(move |frame| *sink.borrow_mut() = Some(frame.clone()));

    let mut renderer = Renderer {
        out: io::stdout().lock(),
        json: args.json,
    };
    if !args.json {
        writeln!(renderer.out, "commands: p = pause/resume, s = stop, r = start, q = quit")?;
    }

    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let input = spawn_input();
    let mut input_open = true;

    if let Some(event) = engine.start() {
        renderer.event(&event, &engine.snapshot())?;
    }

    loop {
        if input_open {
            match input.recv_timeout(frame_interval) {
                Ok(cmd) => {
                    debug!(?cmd, "command");
                    let event = match cmd {
                        Command::PauseResume => engine.pause_or_resume(),
                        Command::Stop => engine.stop(),
                        Command::Start => engine.start(),
                        Command::Quit => break,
                    };
                    if let Some(event) = event {
                        renderer.event(&event, &engine.snapshot())?;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => input_open = false,
            }
        } else {
            std::thread::sleep(frame_interval);
        }

        let completed = engine.tick();
        if let Some(frame) = latest.borrow_mut().take() {
            renderer.frame(&frame)?;
        }
        if let Some(event) = completed {
            renderer.event(&event, &engine.snapshot())?;
            break;
        }
        // Paused or stopped with no way to receive another command.
        if !input_open && !engine.frame_pending() {
            break;
        }
    }

    Ok(())
}
