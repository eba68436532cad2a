use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_START,
    STACK_DEPTH,
};
use crate::error::VmError;

/// A snapshot of the machine's internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer; the index of the next free stack slot
///
/// Timers
/// - 2 8-bit timers (delay & sound)
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the sprite sheet
///     - programs are loaded at 0x200
/// - 64x32 frame buffer and a flag raised whenever it should be redrawn
///
/// ## Input
/// - Emulation halts in `Mode::AwaitingKey` until a key is pressed
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub mode: Mode,
}

/// Whether the CPU fetches instructions or is blocked on the keypad.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Running,
    /// Blocked on `Fx0A`; the pressed key will be written to the contained register.
    AwaitingKey(u8),
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = SPRITE_SHEET_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            mode: Mode::Running,
        }
    }

    /// Reads the 16-bit opcode at the pc.
    /// Memory is stored as bytes so two subsequent bytes are combined, big-endian.
    pub fn fetch(&self) -> Result<u16, VmError> {
        let pc = self.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(VmError::ProgramCounterOutOfBounds { pc: self.pc });
        }
        Ok(u16::from(self.memory[pc]) << 8 | u16::from(self.memory[pc + 1]))
    }

    pub fn read(&self, address: usize) -> Result<u8, VmError> {
        self.memory
            .get(address)
            .copied()
            .ok_or(VmError::MemoryOutOfBounds { address })
    }

    /// Borrows `len` bytes of memory starting at `address`.
    pub fn read_slice(&self, address: usize, len: usize) -> Result<&[u8], VmError> {
        check_range(address, len)?;
        Ok(&self.memory[address..address + len])
    }

    /// Copies `bytes` into memory starting at `address`; nothing is written if any byte would
    /// land out of bounds.
    pub fn write_slice(&mut self, address: usize, bytes: &[u8]) -> Result<(), VmError> {
        check_range(address, bytes.len())?;
        self.memory[address..address + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn push(&mut self, address: u16) -> Result<(), VmError> {
        let sp = self.sp as usize;
        if sp >= STACK_DEPTH {
            return Err(VmError::StackOverflow { depth: STACK_DEPTH });
        }
        self.stack[sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, VmError> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(address: usize, len: usize) -> Result<(), VmError> {
    if address + len > MEMORY_SIZE {
        // report the first byte that doesn't fit
        let first_bad = address.max(MEMORY_SIZE);
        return Err(VmError::MemoryOutOfBounds { address: first_bad });
    }
    Ok(())
}

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of keys 0..F
pub type Keypad = [bool; 16];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_loads_sprite_sheet() {
        let state = State::new();
        assert_eq!(state.memory[0x050..0x055], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(state.memory[0x09B..0x0A0], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_fetch_is_big_endian() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch().unwrap(), 0xAABB);
    }

    #[test]
    fn test_fetch_past_end_of_memory() {
        let mut state = State::new();
        state.pc = 0xFFF;
        assert!(matches!(
            state.fetch(),
            Err(VmError::ProgramCounterOutOfBounds { pc: 0xFFF })
        ));
    }

    #[test]
    fn test_read_out_of_bounds() {
        let state = State::new();
        assert!(matches!(
            state.read(0x1000),
            Err(VmError::MemoryOutOfBounds { address: 0x1000 })
        ));
    }

    #[test]
    fn test_write_slice_straddling_end_writes_nothing() {
        let mut state = State::new();
        let result = state.write_slice(0xFFE, &[1, 2, 3]);
        assert!(matches!(
            result,
            Err(VmError::MemoryOutOfBounds { address: 0x1000 })
        ));
        assert_eq!(state.memory[0xFFE..], [0, 0]);
    }

    #[test]
    fn test_read_slice_up_to_last_byte() {
        let mut state = State::new();
        state.memory[0xFFD..].copy_from_slice(&[7, 8, 9]);
        assert_eq!(state.read_slice(0xFFD, 3).unwrap(), &[7, 8, 9]);
    }

    #[test]
    fn test_push_pop() {
        let mut state = State::new();
        state.push(0x0ABC).unwrap();
        assert_eq!(state.sp, 1);
        assert_eq!(state.pop().unwrap(), 0x0ABC);
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_push_full_stack_overflows() {
        let mut state = State::new();
        for n in 0..STACK_DEPTH as u16 {
            state.push(n).unwrap();
        }
        assert!(matches!(
            state.push(0x200),
            Err(VmError::StackOverflow { depth: 16 })
        ));
        assert_eq!(state.sp as usize, STACK_DEPTH);
    }

    #[test]
    fn test_pop_empty_stack_underflows() {
        let mut state = State::new();
        assert!(matches!(state.pop(), Err(VmError::StackUnderflow)));
        assert_eq!(state.sp, 0);
    }
}
