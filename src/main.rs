//! mrtouch - headless touch interaction runner
//!
//! Replays scripted pointer paths against pressable buttons and reports what happened.

mod config;
mod scenario;

use anyhow::Result;
use clap::Parser;
use config::SceneConfig;
use mrtouch_testkit::JsonlSink;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay scripted touch pointers against pressable buttons", long_about = None)]
struct Args {
    /// Scene description (TOML)
    #[arg(long)]
    scene: PathBuf,

    /// Write every event as JSON lines to this path
    #[arg(long)]
    events: Option<PathBuf>,

    /// Fail on unreadable or invalid scenes instead of using defaults
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting mrtouch v{}", env!("CARGO_PKG_VERSION"));

    let scene = if args.strict {
        SceneConfig::load_strict(&args.scene)?
    } else {
        SceneConfig::load_from_path(&args.scene)
    };

    let mut sink = args.events.as_ref().map(JsonlSink::create).transpose()?;
    let report = scenario::run(&scene, sink.as_mut())?;

    info!(
        frames = report.frames,
        events = report.events,
        "Scene finished"
    );
    for button in &report.buttons {
        println!(
            "{}: pressed {} released {} state {:?}",
            button.name, button.presses, button.releases, button.state
        );
    }

    Ok(())
}
