use std::io::Read;

use log::{error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction;
use crate::operations::{Context, Flow};
use crate::quirks::Quirks;
use crate::state::{FrameBuffer, State};

/// What the machine will do on its next CPU cycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    /// An Fx0A instruction is polling the keys for Vx
    AwaitingKey { register: usize },
    /// A fatal error stopped the machine; see `Chip8::fault`
    Halted,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `keys` last pushed by the driver
///  - the `quirks` policy fixed at construction
///
/// Supplies interfaces for:
/// - loading roms
/// - setting the pressed keys
/// - advancing the CPU and the timers, at whatever rate the driver chooses
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    keys: [bool; KEY_COUNT],
    quirks: Quirks,
    rng: Box<dyn RngCore + Send>,
    diagnostic: Box<dyn FnMut(u16) + Send>,
    status: Status,
    fault: Option<Chip8Error>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            keys: [false; KEY_COUNT],
            quirks,
            rng: Box::new(StdRng::from_entropy()),
            diagnostic: Box::new(|opcode: u16| warn!("{}", Chip8Error::UnknownOpcode { opcode })),
            status: Status::Running,
            fault: None,
        }
    }

    /// Replaces the random number generator with one seeded by `seed`, making Cxnn reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Box::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Replaces the callback that hears about unknown opcodes.
    /// The callback gets the raw opcode; the instruction is skipped whatever it does.
    pub fn set_diagnostic(&mut self, diagnostic: impl FnMut(u16) + Send + 'static) {
        self.diagnostic = Box::new(diagnostic);
    }

    /// Load a rom into memory at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program; anything longer than 3584 bytes is rejected
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = usize::from(PROGRAM_START);
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Load a rom from some source, e.g. a file
    ///
    /// # Arguments
    /// * `reader` a reader that yields the whole ROM
    pub fn load_rom_from(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    /// Replace the pressed status of every key
    ///
    /// # Arguments
    /// * `keys` pressed status indexed by key 0x0..=0xF
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.keys.get_mut(usize::from(key)) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring key {:#04X}, the keypad only has 0x0..=0xF", key),
        }
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at PC
    /// - decodes and executes it, or reports it to the diagnostic callback if it's unknown
    /// - moves PC on to the next instruction
    ///
    /// Fatal errors halt the machine; every later call returns the same error.
    pub fn tick_cpu(&mut self) -> Result<Status, Chip8Error> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        let op = match self.fetch() {
            Ok(op) => op,
            Err(e) => return Err(self.halt(e)),
        };
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );

        let flow = match instruction::from_op(op) {
            Some(operation) => {
                let mut ctx = Context {
                    keys: &self.keys,
                    quirks: &self.quirks,
                    rng: &mut *self.rng,
                };
                match operation(op, &mut self.state, &mut ctx) {
                    Ok(flow) => flow,
                    Err(e) => return Err(self.halt(e)),
                }
            }
            None => {
                (self.diagnostic)(op);
                Flow::Next
            }
        };

        self.status = match flow {
            Flow::AwaitKey(register) => Status::AwaitingKey { register },
            _ => Status::Running,
        };
        self.state.pc = flow.next_pc(self.state.pc);
        Ok(self.status)
    }

    fn halt(&mut self, e: Chip8Error) -> Chip8Error {
        error!("halting: {}", e);
        self.status = Status::Halted;
        self.fault = Some(e.clone());
        e
    }

    /// Decrements the delay and sound timers; to be called at 60Hz
    pub fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self) -> Result<u16, Chip8Error> {
        let pc = usize::from(self.state.pc);
        if pc + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::FetchOutOfBounds { pc: self.state.pc });
        }
        let left = u16::from(self.state.memory[pc]);
        let right = u16::from(self.state.memory[pc + 1]);
        Ok(left << 8 | right)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether the frame buffer changed since the driver last cleared the flag
    pub fn redraw_pending(&self) -> bool {
        self.state.draw_flag
    }

    pub fn clear_redraw(&mut self) {
        self.state.draw_flag = false;
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the redraw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The error that halted the machine, if any
    pub fn fault(&self) -> Option<&Chip8Error> {
        self.fault.as_ref()
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    /// Read-only view of registers, memory and timers
    pub fn state(&self) -> &State {
        &self.state
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
