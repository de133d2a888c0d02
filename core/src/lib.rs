pub use chip8::{Chip8, Status};
pub use error::Chip8Error;
pub use quirks::Quirks;
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod quirks;
pub mod state;
