//! Run one simulation without a window and export its step log
//!
//! Usage: run_headless [--config PATH] [--profile NAME] [--seed N]
//!                     [--max-steps N] [--out DIR] [--compact]

use std::env;
use std::process;

use tracing::error;

use mazebot::config::{Config, CONFIG_PATH};
use mazebot::SimulationSession;

const DEFAULT_MAX_STEPS: usize = 10_000;

struct Args {
    config_path: String,
    profile: Option<String>,
    seed: Option<u64>,
    max_steps: Option<usize>,
    out: Option<String>,
    compact: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: CONFIG_PATH.to_string(),
        profile: None,
        seed: None,
        max_steps: None,
        out: None,
        compact: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| iter.next().ok_or_else(|| format!("{} needs a value", name));
        match arg.as_str() {
            "--config" => args.config_path = value("--config")?,
            "--profile" => args.profile = Some(value("--profile")?),
            "--seed" => {
                let v = value("--seed")?;
                args.seed = Some(v.parse().map_err(|_| format!("bad seed: {}", v))?);
            }
            "--max-steps" => {
                let v = value("--max-steps")?;
                args.max_steps = Some(v.parse().map_err(|_| format!("bad step count: {}", v))?);
            }
            "--out" => args.out = Some(value("--out")?),
            "--compact" => args.compact = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(args)
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Usage: run_headless [--config PATH] [--profile NAME] [--seed N] \
                 [--max-steps N] [--out DIR] [--compact]"
            );
            process::exit(1);
        }
    };

    let mut config = Config::load_or_default(&args.config_path);
    if let Some(profile) = args.profile {
        config.simulation.profile = profile;
    }
    if args.seed.is_some() {
        config.maze.seed = args.seed;
    }
    if let Some(out) = args.out {
        config.export.directory = out;
    }
    config.export.compact |= args.compact;

    let mut session = match SimulationSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let max_steps = args
        .max_steps
        .or(config.simulation.max_steps)
        .unwrap_or(DEFAULT_MAX_STEPS);
    let run = session.run(max_steps);

    println!("{}", session.grid().to_ascii());
    println!("Profile: {}", session.profile());
    println!("Reached goal: {}", run.reached_goal);
    println!("{}", session.log().summary());

    match session.export(&config.export.directory, config.export.compact) {
        Ok(paths) => {
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
        Err(e) => {
            error!("Export failed: {}", e);
            process::exit(1);
        }
    }
}
