pub use error::VmError;
pub use machine::Machine;
pub use state::{FrameBuffer, Keypad, Mode, State};

pub mod constants;
mod error;
pub mod instruction;
mod machine;
pub mod opcode;
mod operations;
pub mod state;
