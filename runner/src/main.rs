mod autopilot;
mod event_logger;
mod runner_config;
mod session;

use clap::{Parser, ValueEnum};
use snake_engine::config::Validate;
use snake_engine::multiplayer::GameMode;
use snake_engine::{log, logger, GameRng};

use event_logger::EventLogger;
use session::SessionSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    Single,
    Multiplayer,
    Npc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Competitive,
    Cooperative,
    Survival,
}

impl From<Mode> for GameMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Competitive => GameMode::Competitive,
            Mode::Cooperative => GameMode::Cooperative,
            Mode::Survival => GameMode::Survival,
        }
    }
}

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    #[arg(long, help = "YAML settings file; defaults apply when it does not exist")]
    config: Option<String>,

    #[arg(long, value_enum, default_value_t = Variant::Single)]
    variant: Variant,

    #[arg(long, value_enum)]
    mode: Option<Mode>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_ticks: Option<u64>,

    #[arg(long)]
    realtime: bool,

    #[arg(long)]
    use_log_prefix: bool,

    #[arg(long, help = "Silence the log; the summary line is still printed")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, args.quiet);

    let config_file = runner_config::config_file(args.config.as_deref());
    let mut config = config_file.load()?;
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    config.realtime |= args.realtime;
    config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_random(),
    };
    log!(
        "Running {:?} with seed {} (config {})",
        args.variant,
        rng.seed(),
        config_file.path().display()
    );

    let mut events = EventLogger::new(config.event_history, !args.quiet);
    let summary: SessionSummary = match args.variant {
        Variant::Single => session::run_single(&config, &mut rng, &mut events).await?,
        Variant::Multiplayer => session::run_multiplayer(&config, &mut rng, &mut events).await?,
        Variant::Npc => session::run_with_npcs(&config, &mut rng, &mut events).await?,
    };

    println!(
        "{} after {} ticks: {} ({} events)",
        if summary.finished { "Finished" } else { "Stopped" },
        summary.ticks,
        summary.result,
        events.history().total()
    );

    Ok(())
}
