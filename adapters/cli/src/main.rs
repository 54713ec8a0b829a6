#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Rampage headlessly.
//!
//! The adapter generates or imports a level, prints it as ASCII, and then
//! lets an autopilot play a fixed number of frames while the world and its
//! systems log what happens.

mod ascii;
mod autopilot;
mod level_transfer;
mod session;

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use maze_rampage_core::{DisplayProfile, LevelPlan, WorldDimensions};
use maze_rampage_system_level_generation::LevelGenerator;

use crate::session::Session;

/// Screen layouts selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DisplayArg {
    /// Landscape playfield.
    Desktop,
    /// Portrait playfield.
    Mobile,
}

impl From<DisplayArg> for DisplayProfile {
    fn from(value: DisplayArg) -> Self {
        match value {
            DisplayArg::Desktop => DisplayProfile::Desktop,
            DisplayArg::Mobile => DisplayProfile::Mobile,
        }
    }
}

/// Command-line arguments accepted by the Maze Rampage binary.
#[derive(Debug, Parser)]
#[command(name = "maze-rampage", about = "Run Maze Rampage levels headlessly.")]
struct CliArgs {
    /// Screen layout; overrides `--viewport-width`.
    #[arg(long, value_enum)]
    display: Option<DisplayArg>,
    /// Viewport width in pixels used to pick the screen layout.
    #[arg(long, value_name = "PIXELS")]
    viewport_width: Option<u32>,
    /// Level to start on.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,
    /// Global seed; a random one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Print the level as a share string and exit.
    #[arg(long)]
    export: bool,
    /// Play a level previously printed by `--export`.
    #[arg(long, value_name = "LEVEL")]
    import: Option<String>,
}

impl CliArgs {
    fn profile(&self) -> DisplayProfile {
        match (self.display, self.viewport_width) {
            (Some(display), _) => display.into(),
            (None, Some(width)) => DisplayProfile::for_viewport_width(width),
            (None, None) => DisplayProfile::default(),
        }
    }
}

/// Entry point for the Maze Rampage command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    ensure!(args.frame_ms > 0, "frame length must be positive");

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("using seed {seed}");

    let (dimensions, plan) = match &args.import {
        Some(text) => {
            let plan = level_transfer::decode(text).context("failed to import level")?;
            (dimensions_of(&plan), plan)
        }
        None => {
            let dimensions = WorldDimensions::for_profile(args.profile());
            let plan = LevelGenerator::new(dimensions).generate_seeded(seed, args.level);
            (dimensions, plan)
        }
    };

    if args.export {
        let encoded = level_transfer::encode(&plan).context("failed to export level")?;
        println!("{encoded}");
        return Ok(());
    }

    println!("{}", ascii::render_plan(&plan));

    let mut session = Session::new(dimensions, seed);
    session.start(plan);
    let summary = session.run(args.frames, Duration::from_millis(args.frame_ms));
    println!("{summary}");
    Ok(())
}

/// Playfield size implied by an imported plan's grid.
fn dimensions_of(plan: &LevelPlan) -> WorldDimensions {
    let tile = plan.grid.tile_length();
    WorldDimensions::new(
        plan.grid.columns() as f32 * tile,
        plan.grid.rows() as f32 * tile,
        tile,
    )
}
