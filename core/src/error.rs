use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Stack faults and running off the end of memory are fatal for the machine that raised them:
/// it halts and keeps returning the same error. Unknown opcodes are never returned from a
/// tick; they are reported through the diagnostic callback and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("ROM is {size} bytes but at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("failed to read ROM: {0}")]
    Io(String),

    #[error("stack overflow: call at {pc:#05X} with all {depth} stack slots in use")]
    StackOverflow { pc: u16, depth: usize },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("program counter {pc:#05X} ran off the end of memory")]
    FetchOutOfBounds { pc: u16 },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },
}

impl From<std::io::Error> for Chip8Error {
    fn from(e: std::io::Error) -> Self {
        Chip8Error::Io(e.to_string())
    }
}
