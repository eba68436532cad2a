use thiserror::Error;

/// Faults raised while loading or executing a program.
///
/// The instruction set assumes well-formed programs; anything that would index past the end of
/// memory or the call stack is reported here instead of aborting the process.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("program counter {pc:#06X} is outside of addressable memory")]
    ProgramCounterOutOfBounds { pc: u16 },

    #[error("stack overflow: more than {depth} nested subroutine calls")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("failed to read ROM: {0}")]
    Io(#[from] std::io::Error),
}
