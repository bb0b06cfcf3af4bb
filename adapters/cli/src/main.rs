#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Lane Battle match headlessly.

mod autopilot;
mod settings;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use lane_battle_core::{Event, MatchState, Team};
use lane_battle_match::{Frame, Match};
use log::info;

use crate::{autopilot::Autopilot, settings::Settings};

/// Headless lane battle simulator.
#[derive(Parser, Debug)]
#[command(name = "lane-battle", version, about, long_about = None)]
struct Args {
    /// Seed for unit placement and enemy choices, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to run unless a tower falls first
    #[arg(short, long, default_value_t = 180.0)]
    duration: f32,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16)]
    dt: u64,

    /// TOML file with arena overrides and an optional card list
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Let a scripted player deploy cards and cast spells
    #[arg(long)]
    autoplay: bool,

    /// Print the final frame as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// Entry point for the Lane Battle command-line interface.
fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    ensure!(args.dt > 0, "--dt must be at least one millisecond");
    ensure!(
        args.duration.is_finite() && args.duration >= 0.0,
        "--duration must be a non-negative number of seconds"
    );

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let (mut arena, catalog) = settings.into_parts()?;
    if let Some(seed) = args.seed {
        arena.seed = seed;
    }

    let dt = Duration::from_millis(args.dt);
    let ticks = (f64::from(args.duration) * 1_000.0 / args.dt as f64).ceil() as u64;
    info!(
        "running {ticks} ticks of {}ms with seed {}",
        args.dt, arena.seed
    );

    let mut battle = Match::new(arena, catalog);
    let mut pilot = args.autoplay.then(Autopilot::default);
    let mut tally = Tally::default();

    for _ in 0..ticks {
        if let Some(pilot) = pilot.as_mut() {
            pilot.step(&mut battle);
        }
        battle.tick(dt);
        tally.record(&battle.drain_events());
        if !battle.state().is_active() {
            break;
        }
    }
    tally.record(&battle.drain_events());

    let frame = battle.frame();
    if args.json {
        let encoded =
            serde_json::to_string_pretty(&frame).context("failed to encode the final frame")?;
        println!("{encoded}");
    } else {
        print_summary(&frame, &tally, dt);
    }
    Ok(())
}

/// Running totals gathered from the event journal.
#[derive(Debug, Default)]
struct Tally {
    deployed: [u32; 2],
    rejected: u32,
    defeated: [u32; 2],
    detonations: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CardDeployed { team, .. } => self.deployed[slot(*team)] += 1,
                Event::DeployRejected { .. } | Event::CastRejected { .. } => self.rejected += 1,
                Event::UnitDefeated { team, .. } => self.defeated[slot(*team)] += 1,
                Event::SpellDetonated { .. } => self.detonations += 1,
                _ => {}
            }
        }
    }
}

const fn slot(team: Team) -> usize {
    match team {
        Team::Player => 0,
        Team::Enemy => 1,
    }
}

fn print_summary(frame: &Frame, tally: &Tally, dt: Duration) {
    let simulated = dt.as_secs_f64() * frame.tick as f64;
    let outcome = match frame.state {
        MatchState::Active => "still running".to_owned(),
        MatchState::Ended { winner: Some(team) } => format!("{team:?} wins"),
        MatchState::Ended { winner: None } => "draw".to_owned(),
    };

    println!("{outcome} after {} ticks ({simulated:.1}s)", frame.tick);
    for team in Team::ALL {
        let tower = frame.towers.get(team);
        println!(
            "{team:?}: tower {:.0}/{:.0}, elixir {:.1}, units {}, deployed {}, lost {}",
            tower.hp.max(0.0),
            tower.max_hp,
            frame.elixir.get(team),
            frame.units.get(team).len(),
            tally.deployed[slot(team)],
            tally.defeated[slot(team)],
        );
    }
    println!(
        "spells detonated: {}, requests rejected: {}",
        tally.detonations, tally.rejected
    );
}
