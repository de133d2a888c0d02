use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use emu8_core::constants::{KEY_COUNT, TIMER_HZ};
use emu8_core::Chip8;
use emu8_display::{Display, Palette};

use crate::clock::Clock;
use crate::keymap::keymap;

/// How long the loop idles between polls so it doesn't spin a core
const IDLE: Duration = Duration::from_millis(1);

/// Drives `chip8` in an SDL window until the window is closed or Escape is pressed.
///
/// The CPU is ticked `cpu_hz` times a second and the timers 60 times a second, both from the
/// same wall clock. If the machine halts the window stays open on the last frame and the
/// fault is returned once the user quits.
pub fn run(mut chip8: Chip8, cpu_hz: u32, scale: u32, palette: Palette) -> Result<()> {
    let sdl = sdl2::init().map_err(|e| anyhow!("failed to initialise SDL: {}", e))?;
    let mut display = Display::new(&sdl, scale, palette)?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let mut keys = [false; KEY_COUNT];
    let mut cpu_clock = Clock::new(cpu_hz);
    let mut timer_clock = Clock::new(TIMER_HZ);
    let mut last_cycle = Instant::now();
    let mut beeping = false;
    let mut fault = None;

    // Draw the empty screen straight away
    display.render(chip8.frame_buffer())?;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    scancode: Some(key),
                    ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keys[usize::from(kc)] = true;
                    }
                }
                Event::KeyUp {
                    scancode: Some(key),
                    ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keys[usize::from(kc)] = false;
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let current_time = Instant::now();
        let elapsed = current_time - last_cycle;
        last_cycle = current_time;

        for _ in 0..timer_clock.advance(elapsed) {
            chip8.tick_timers();
        }

        if fault.is_none() {
            for _ in 0..cpu_clock.advance(elapsed) {
                chip8.set_keys(keys);
                if let Err(e) = chip8.tick_cpu() {
                    error!("emulation stopped: {}", e);
                    fault = Some(e);
                    break;
                }
            }
        }

        if chip8.sound_active() != beeping {
            beeping = chip8.sound_active();
            debug!("sound {}", if beeping { "on" } else { "off" });
        }

        // If the draw flag is set, render the current frame and unset it
        if chip8.redraw_pending() {
            display.render(chip8.frame_buffer())?;
            chip8.clear_redraw();
        }

        thread::sleep(IDLE);
    }

    info!("window closed");
    match fault {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
