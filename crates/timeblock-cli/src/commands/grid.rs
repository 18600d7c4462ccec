use std::path::Path;

use clap::Args;
use timeblock_core::TimeGrid;

use super::{load_config, print_json, CmdResult};

#[derive(Args)]
pub struct GridArgs {
    /// First hour of the grid (defaults to grid.lower_hour)
    #[arg(long)]
    pub lower: Option<u32>,
    /// Hour the grid stops at (defaults to grid.upper_hour)
    #[arg(long)]
    pub upper: Option<u32>,
    /// Slot width in minutes (defaults to grid.slot_minutes)
    #[arg(long)]
    pub slot: Option<u32>,
}

pub fn run(args: GridArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let grid = TimeGrid::generate(
        args.lower.unwrap_or(config.grid.lower_hour),
        args.upper.unwrap_or(config.grid.upper_hour),
        args.slot.unwrap_or(config.grid.slot_minutes),
    )?;
    print_json(&grid)
}
