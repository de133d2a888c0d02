use rand::{Rng, RngCore};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, STACK_SIZE};
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use crate::state::State;

/// Everything an instruction may read besides the machine state itself.
pub struct Context<'a> {
    pub keys: &'a [bool; 16],
    pub quirks: &'a Quirks,
    pub rng: &'a mut (dyn RngCore + Send),
}

/// Where the program counter goes after an instruction has executed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// PC += 2
    Next,
    /// PC += 4
    Skip,
    /// PC = addr
    Jump(u16),
    /// PC is left alone so the instruction runs again; Vx is waiting for a key
    AwaitKey(usize),
}

impl Flow {
    fn skip_if(condition: bool) -> Self {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }

    /// The address of the next instruction given the address of the current one
    pub fn next_pc(self, pc: u16) -> u16 {
        match self {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Jump(addr) => addr,
            Flow::AwaitKey(_) => pc,
        }
    }
}

pub type Operation = fn(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error>;

/// clear
pub fn clr(_op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// PC = STACK.pop()
pub fn rts(_op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow { pc: state.pc });
    }
    state.sp -= 1;
    Ok(Flow::Jump(state.stack[state.sp]))
}

/// PC = nnn
pub fn jump(op: u16, _state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::Jump(op.nnn()))
}

/// STACK.push(PC + 2); PC = nnn
pub fn call(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    if state.sp == STACK_SIZE {
        return Err(Chip8Error::StackOverflow {
            pc: state.pc,
            depth: STACK_SIZE,
        });
    }
    state.stack[state.sp] = state.pc.wrapping_add(2);
    state.sp += 1;
    Ok(Flow::Jump(op.nnn()))
}

/// if Vx == nn then skip
pub fn ske(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(state.v[op.x()] == op.nn()))
}

/// if Vx != nn then skip
pub fn skne(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(state.v[op.x()] != op.nn()))
}

/// if Vx == Vy then skip
pub fn skre(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(state.v[op.x()] == state.v[op.y()]))
}

/// Vx = nn
pub fn load(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] = op.nn();
    Ok(Flow::Next)
}

/// Vx += nn
/// Overflow wraps and VF is left alone
pub fn add(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.nn());
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] = state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx += Vy; VF = overflow
pub fn addr(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[0xF] = u8::from(over);
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let (res, under) = state.v[op.x()].overflowing_sub(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[0xF] = u8::from(!under);
    Ok(Flow::Next)
}

/// Vx = Vx >> 1; VF = dropped bit
/// The shifted value is Vy rather than Vx under `Quirks::shift_reads_vy`
pub fn shr(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let source = shift_source(op, state, ctx.quirks);
    state.v[op.x()] = source >> 1;
    state.v[0xF] = source & 0x1;
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let (res, under) = state.v[op.y()].overflowing_sub(state.v[op.x()]);
    state.v[op.x()] = res;
    state.v[0xF] = u8::from(!under);
    Ok(Flow::Next)
}

/// Vx = Vx << 1; VF = dropped bit
/// The shifted value is Vy rather than Vx under `Quirks::shift_reads_vy`
pub fn shl(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let source = shift_source(op, state, ctx.quirks);
    state.v[op.x()] = source << 1;
    state.v[0xF] = source >> 7;
    Ok(Flow::Next)
}

fn shift_source(op: u16, state: &State, quirks: &Quirks) -> u8 {
    if quirks.shift_reads_vy {
        state.v[op.y()]
    } else {
        state.v[op.x()]
    }
}

/// if Vx != Vy then skip
pub fn skrne(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(state.v[op.x()] != state.v[op.y()]))
}

/// I = nnn
pub fn loadi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.i = op.nnn();
    Ok(Flow::Next)
}

/// PC = V0 + nnn
/// Under `Quirks::jump_offset_uses_vx` the offset comes from Vx, x being the top nibble of nnn
pub fn jumpi(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let register = if ctx.quirks.jump_offset_uses_vx {
        op.x()
    } else {
        0x0
    };
    Ok(Flow::Jump(u16::from(state.v[register]) + op.nnn()))
}

/// Vx = rand_byte & nn
pub fn rand(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let rand_byte: u8 = ctx.rng.gen();
    state.v[op.x()] = rand_byte & op.nn();
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels are erased
pub fn draw(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let origin_x = usize::from(state.v[op.x()]);
    let origin_y = usize::from(state.v[op.y()]);

    // VF doubles as the collision flag
    state.v[0xF] = 0x0;

    for row in 0..usize::from(op.n()) {
        let sprite_byte = state.read_indexed(row);
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite_byte & (0x80 >> bit) == 0 {
                continue;
            }
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[y][x];
            if *pixel == 1 {
                state.v[0xF] = 0x1;
            }
            *pixel ^= 1;
        }
    }

    state.draw_flag = true;
    Ok(Flow::Next)
}

/// if Vx.pressed then skip
pub fn skpr(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(is_pressed(ctx.keys, state.v[op.x()])))
}

/// if !Vx.pressed then skip
pub fn skup(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(!is_pressed(ctx.keys, state.v[op.x()])))
}

// Register values above 0xF don't name a key
fn is_pressed(keys: &[bool; 16], key: u8) -> bool {
    keys.get(usize::from(key)).copied().unwrap_or(false)
}

/// Vx = DT
pub fn moved(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.v[op.x()] = state.delay_timer;
    Ok(Flow::Next)
}

/// await keypress for Vx
/// Polls the keys once; with nothing pressed the same instruction runs again next cycle
pub fn keyd(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    match ctx.keys.iter().position(|&pressed| pressed) {
        Some(key) => {
            state.v[op.x()] = key as u8;
            Ok(Flow::Next)
        }
        None => Ok(Flow::AwaitKey(op.x())),
    }
}

/// DT = Vx
pub fn loads(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.delay_timer = state.v[op.x()];
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.sound_timer = state.v[op.x()];
    Ok(Flow::Next)
}

/// I += Vx; VF = I > 0xFFF
pub fn addi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let sum = u32::from(state.i) + u32::from(state.v[op.x()]);
    state.i = sum as u16;
    state.v[0xF] = u8::from(sum > 0xFFF);
    Ok(Flow::Next)
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    state.i = u16::from(state.v[op.x()]) * FONT_GLYPH_SIZE;
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address I
pub fn bcd(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Flow, Chip8Error> {
    let value = state.v[op.x()];
    let digits = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in digits.iter().enumerate() {
        state.write_indexed(offset, *digit);
    }
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    for register in 0..=op.x() {
        state.write_indexed(register, state.v[register]);
    }
    advance_index(op, state, ctx.quirks);
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: u16, state: &mut State, ctx: &mut Context) -> Result<Flow, Chip8Error> {
    for register in 0..=op.x() {
        state.v[register] = state.read_indexed(register);
    }
    advance_index(op, state, ctx.quirks);
    Ok(Flow::Next)
}

fn advance_index(op: u16, state: &mut State, quirks: &Quirks) {
    if quirks.load_store_increments_i {
        state.i = state.i.wrapping_add(op.x() as u16 + 1);
    }
}
