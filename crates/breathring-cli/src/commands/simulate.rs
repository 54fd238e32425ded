use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use breathring_core::{Event, FrameSnapshot, ManualClock, Result, TimerEngine};
use clap::Args;

use super::{write_json_line, OutputLine, Summary, Tagged, TimerArgs};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub timer: TimerArgs,
    /// Simulated time between frames, in milliseconds
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_ms: u64,
    /// Pause once elapsed time reaches this many milliseconds
    #[arg(long)]
    pub pause_at: Option<u64>,
    /// How long the pause lasts, in milliseconds of wall time
    #[arg(long, default_value_t = 0)]
    pub pause_for: u64,
    /// Stop once elapsed time reaches this many milliseconds
    #[arg(long)]
    pub stop_at: Option<u64>,
    /// Also print every frame
    #[arg(long)]
    pub frames: bool,
}

pub fn run(args: SimulateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = args.timer.resolve(config_path)?;
    let clock = ManualClock::new();
    let mut engine = TimerEngine::new(config, clock.clone())?;
    let mut out = io::stdout().lock();

    let frame_count = Rc::new(Cell::new(0u64));
    let pending: Rc<RefCell<Vec<FrameSnapshot>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let frame_count = Rc::clone(&frame_count);
        let pending = Rc::clone(&pending);
        let keep = args.frames;
        engine.on_frame(move |frame| {
            frame_count.set(frame_count.get() + 1);
            if keep {
                pending.borrow_mut().push(frame.clone());
            }
        });
    }
    let completions = Rc::new(Cell::new(0u64));
    {
        let completions = Rc::clone(&completions);
        engine.on_complete(move |_| completions.set(completions.get() + 1));
    }

    emit(&mut out, engine.start())?;
    let mut paused_once = false;

    loop {
        clock.advance_ms(args.step_ms);
        let completed = engine.tick();
        for frame in pending.borrow_mut().drain(..) {
            write_json_line(&mut out, &OutputLine::Tagged(Tagged::Frame(&frame)))?;
        }
        if completed.is_some() {
            emit(&mut out, completed)?;
            break;
        }

        let elapsed_ms = engine.elapsed().as_millis() as u64;
        if args.stop_at.is_some_and(|at| elapsed_ms >= at) {
            emit(&mut out, engine.stop())?;
            break;
        }
        if !paused_once && args.pause_at.is_some_and(|at| elapsed_ms >= at) {
            paused_once = true;
            emit(&mut out, engine.pause_or_resume())?;
            clock.advance_ms(args.pause_for);
            emit(&mut out, engine.pause_or_resume())?;
        }
    }

    let summary = Summary {
        final_state: engine.state(),
        frames: frame_count.get(),
        completions: completions.get(),
        elapsed_ms: engine.accumulated_elapsed().as_millis() as u64,
        wall_ms: clock.offset().as_millis() as u64,
    };
    write_json_line(&mut out, &OutputLine::Tagged(Tagged::Summary(&summary)))?;
    Ok(())
}

fn emit(out: &mut impl Write, event: Option<Event>) -> Result<()> {
    match event {
        Some(event) => write_json_line(out, &OutputLine::Event(&event)),
        None => Ok(()),
    }
}
