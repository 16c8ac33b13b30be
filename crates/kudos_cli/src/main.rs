mod commands;

use chrono::Local;
use clap::Parser;
use commands::{Command, Session, HELP};
use kudos_core::{Intensity, KudosConfig};
use kudos_expression::{EffectInstance, FeedbackEngine, LogToastSurface};
use kudos_limbic::ActivityMonitor;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "kudos.toml")]
    config: PathBuf,

    /// Global effect intensity (low, medium, high)
    #[arg(short, long, env = "KUDOS_INTENSITY")]
    intensity: Option<String>,

    /// Start with animations turned off
    #[arg(long)]
    no_animations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    info!("Initializing Kudos...");

    // 1. Config
    let mut config = KudosConfig::load_or_default(&args.config);
    if let Some(level) = args.intensity.as_deref() {
        config.settings.intensity = Intensity::parse_lenient(level);
    }
    if args.no_animations {
        config.settings.animations_enabled = false;
    }

    // 2. Engine
    let catalog = config.load_catalog();
    info!("{} achievements in catalog", catalog.len());
    let engine = Arc::new(FeedbackEngine::new(&config, catalog, Arc::new(LogToastSurface)));
    let notifier = engine.spawn_mood_notifier();

    // 3. Renderer: prints entries as they appear and disappear
    let mut frames = engine.registry().subscribe();
    let renderer = tokio::spawn(async move {
        let mut shown: BTreeSet<String> = BTreeSet::new();
        while frames.changed().await.is_ok() {
            let frame: Vec<EffectInstance> = frames.borrow_and_update().clone();
            let now: BTreeSet<String> = frame.iter().map(|fx| fx.id.to_string()).collect();
            for fx in frame.iter().filter(|fx| !shown.contains(&fx.id.to_string())) {
                println!(
                    "  [render] + {} {} x{} {}ms {}",
                    fx.id,
                    fx.family,
                    fx.element_count,
                    fx.duration_ms,
                    fx.message.as_deref().unwrap_or("").replace('\n', " / ")
                );
            }
            for gone in shown.difference(&now) {
                println!("  [render] - {}", gone);
            }
            shown = now;
        }
    });

    let mut session = Session {
        engine: engine.clone(),
        monitor: ActivityMonitor::new(config.probes.clone(), Local::now()),
    };

    println!(
        "Kudos online (animations {}, intensity {}). Type 'help' for commands.",
        if config.settings.animations_enabled { "on" } else { "off" },
        config.settings.intensity
    );
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        match Command::parse(&input) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => match session.execute(command) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    error!("Command failed: {}", e);
                    println!("[error] {}", e);
                }
            },
            Err(e) => println!("[error] {}\n{}", e, HELP),
        }

        print!("> ");
        io::stdout().flush()?;
    }

    engine.shutdown();
    notifier.abort();
    renderer.abort();
    Ok(())
}
