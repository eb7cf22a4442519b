//! # XArm Episode Runner
//!
//! Entry point for the episode-runner binary. Loads a tabletop scene,
//! builds the requested task environment and rolls out scripted episodes,
//! optionally dumping a rendered frame per episode.

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Task selection for the episode runner.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaskKind {
    /// Drive the end-effector to a sampled goal point.
    Reach,
    /// Grasp the object and raise it off the table.
    Lift,
}

#[derive(Debug, Parser)]
#[command(about = "Roll out scripted episodes on the arm environments")]
pub struct Args {
    /// Task to run.
    #[arg(long, value_enum, default_value = "reach")]
    pub task: TaskKind,

    /// Number of episodes.
    #[arg(long, default_value_t = 5)]
    pub episodes: u32,

    /// Control steps per episode.
    #[arg(long, default_value_t = 150)]
    pub steps: u32,

    /// Goal-sampling seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Directory containing scene descriptions.
    #[arg(long, default_value = "assets")]
    pub asset_root: PathBuf,

    /// Scene description name (without extension).
    #[arg(long, default_value = "xarm")]
    pub scene: String,

    /// Dump one PNG frame per episode into this directory.
    #[arg(long)]
    pub render_dir: Option<PathBuf>,

    /// Rendered frame width.
    #[arg(long, default_value_t = 384)]
    pub width: u32,

    /// Rendered frame height.
    #[arg(long, default_value_t = 384)]
    pub height: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    app::run(&Args::parse())
}
