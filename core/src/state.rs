use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, STACK_SIZE,
};

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) index of the next free stack slot
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented at 60Hz by the driver
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet, which programs cannot overwrite
///     - programs are loaded at 0x200
/// - 32x64 byte frame buffer
///     - stores the contents of the next frame to be drawn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[0..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }

    /// Reads the byte `offset` bytes past I.
    /// Addresses wrap around the end of memory.
    pub fn read_indexed(&self, offset: usize) -> u8 {
        self.memory[indexed_address(self.i, offset)]
    }

    /// Writes the byte `offset` bytes past I.
    /// Addresses wrap around the end of memory. Writes into the sprite sheet are dropped.
    pub fn write_indexed(&mut self, offset: usize, value: u8) {
        let address = indexed_address(self.i, offset);
        if address < SPRITE_SHEET.len() {
            log::debug!("dropped write of {:#04X} to font memory at {:#05X}", value, address);
            return;
        }
        self.memory[address] = value;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn indexed_address(i: u16, offset: usize) -> usize {
    (usize::from(i) + offset) % MEMORY_SIZE
}

/// The FrameBuffer is indexed as [y][x]; each pixel is 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_loads_sprite_sheet() {
        let state = State::new();
        assert_eq!(state.memory[0x00..0x05], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(state.memory[0x4B..0x50], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(state.memory[0x50..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_state_is_zeroed() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.i, 0);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.stack, [0; 16]);
        assert_eq!((state.delay_timer, state.sound_timer), (0, 0));
        assert!(!state.draw_flag);
    }

    #[test]
    fn test_indexed_access_wraps() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.write_indexed(0, 0xAA);
        state.write_indexed(0x51, 0xBB);
        assert_eq!(state.memory[0xFFF], 0xAA);
        assert_eq!(state.memory[0x050], 0xBB);
        assert_eq!(state.read_indexed(0x51), 0xBB);
        // reads may still land in the sprite sheet
        assert_eq!(state.read_indexed(1), 0xF0);
    }

    #[test]
    fn test_indexed_writes_leave_sprite_sheet_intact() {
        let mut state = State::new();
        state.i = 0x000;
        for offset in 0..0x50 {
            state.write_indexed(offset, 0xFF);
        }
        assert_eq!(state.memory[0..0x50], SPRITE_SHEET);

        // the same holds when the write wraps past the end of memory
        state.i = 0xFFF;
        state.write_indexed(1, 0xFF);
        assert_eq!(state.memory[0x000], 0xF0);
    }
}
