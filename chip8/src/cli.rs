use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sdl2::pixels::Color;

use emu8_core::constants::DEFAULT_CPU_HZ;
use emu8_core::Quirks;
use emu8_display::Palette;

/// Which historic interpreter to imitate where they disagree
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Profile {
    Default,
    CosmacVip,
    Chip48,
}

#[derive(Parser, Debug)]
#[clap(name = "emu8", version, about = "A CHIP-8 emulator")]
pub struct Args {
    /// ROM file to run
    pub rom: PathBuf,

    /// CPU cycles per second
    #[clap(long, default_value_t = DEFAULT_CPU_HZ, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    pub cpu_hz: u32,

    /// Size of each CHIP-8 pixel in screen pixels
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Quirk preset
    #[clap(long, value_enum, default_value_t = Profile::Default)]
    pub profile: Profile,

    /// 8xy6/8xyE shift Vy into Vx instead of shifting Vx in place
    #[clap(long)]
    pub shift_vy: bool,

    /// Fx55/Fx65 leave I unchanged
    #[clap(long)]
    pub no_index_increment: bool,

    /// Bnnn jumps relative to Vx instead of V0
    #[clap(long)]
    pub jump_vx: bool,

    /// Seed for the random number generator
    #[clap(long)]
    pub seed: Option<u64>,

    /// Colour of lit pixels as RRGGBB
    #[clap(long, default_value = "FFFFFF", value_parser = parse_colour)]
    pub foreground: Color,

    /// Colour of unlit pixels as RRGGBB
    #[clap(long, default_value = "000000", value_parser = parse_colour)]
    pub background: Color,

    /// Debug logging
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The profile's quirks with any single-flag overrides applied on top
    pub fn quirks(&self) -> Quirks {
        let mut quirks = match self.profile {
            Profile::Default => Quirks::default(),
            Profile::CosmacVip => Quirks::cosmac_vip(),
            Profile::Chip48 => Quirks::chip48(),
        };
        if self.shift_vy {
            quirks.shift_reads_vy = true;
        }
        if self.no_index_increment {
            quirks.load_store_increments_i = false;
        }
        if self.jump_vx {
            quirks.jump_offset_uses_vx = true;
        }
        quirks
    }

    pub fn palette(&self) -> Palette {
        Palette {
            foreground: self.foreground,
            background: self.background,
        }
    }
}

fn parse_colour(s: &str) -> Result<Color, String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got {:?}", s));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|e| format!("{:?} is not hex: {}", s, e))?;
    Ok(Color::RGB((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}
