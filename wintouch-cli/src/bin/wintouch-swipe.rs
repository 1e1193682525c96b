//! Standalone CLI that plays the scripted swipe into the foreground window.
//!
//! Press at (640,480), land at (957,1077), slide 100 px up in ten 100 ms
//! steps, lift.  The gesture itself is fixed; only the backend and the
//! output are selectable.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use wintouch_core::errors::TouchError;
use wintouch_core::sequencer::{GestureScript, Progress, RunReport, TouchSequencer};
use wintouch_core::sink::{Backend, RecordingSink, ThreadPacer, TouchSink};

#[derive(Parser)]
#[command(
    name = "wintouch-swipe",
    about = "Inject a scripted single-finger swipe via Win32 touch injection"
)]
struct Args {
    /// Injection path to drive
    #[arg(short, long, value_enum, default_value_t = BackendArg::Legacy)]
    backend: BackendArg,

    /// Record the gesture in memory instead of injecting it
    #[arg(long)]
    dry_run: bool,

    /// Print a JSON run report when the gesture completes
    #[arg(long)]
    json: bool,

    /// Enable debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// InitializeTouchInjection + InjectTouchInput
    Legacy,
    /// CreateSyntheticPointerDevice + InjectSyntheticPointerInput
    Synthetic,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Legacy => Backend::Legacy,
            BackendArg::Synthetic => Backend::Synthetic,
        }
    }
}

fn print_progress(progress: Progress) {
    match progress {
        Progress::Initialized => println!("Touch injection initialized"),
        Progress::Started => println!("Touch started"),
        Progress::Moved { step, position } => {
            println!("Moved to ({}, {}) [{step}]", position.x, position.y)
        }
        Progress::Released => println!("Touch released"),
    }
}

fn play<S: TouchSink>(sink: S) -> Result<RunReport, TouchError> {
    let mut sequencer = TouchSequencer::new(sink, ThreadPacer, GestureScript::default());
    sequencer.run(print_progress)
}

#[cfg(windows)]
fn open_sink(backend: Backend) -> Result<Box<dyn TouchSink>, TouchError> {
    Ok(wintouch_core::backend::open(backend))
}

#[cfg(not(windows))]
fn open_sink(backend: Backend) -> Result<Box<dyn TouchSink>, TouchError> {
    Err(TouchError::Unsupported(format!(
        "{} requires Windows 8 or later; use --dry-run on this platform",
        backend.name()
    )))
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let backend = Backend::from(args.backend);
    let result = if args.dry_run {
        log::info!("dry run: recording {} calls", backend.name());
        play(RecordingSink::new(backend))
    } else {
        open_sink(backend).and_then(play)
    };

    match result {
        Ok(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("wintouch-swipe: report serialization failed: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("wintouch-swipe: {e}");
            std::process::exit(1);
        }
    }
}
