use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use emu8_core::Chip8;

mod cli;
mod clock;
mod keymap;
mod run;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let rom = fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;

    let quirks = args.quirks();
    info!(
        "running {} at {}Hz with {:?}",
        args.rom.display(),
        args.cpu_hz,
        quirks
    );

    let mut chip8 = Chip8::with_quirks(quirks);
    if let Some(seed) = args.seed {
        chip8 = chip8.with_seed(seed);
    }
    chip8
        .load_rom(&rom)
        .with_context(|| format!("unable to load ROM {}", args.rom.display()))?;

    run::run(chip8, args.cpu_hz, args.scale, args.palette())
}
