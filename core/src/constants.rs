/// Bytes of addressable memory.
pub const MEMORY_SIZE: usize = 4096;

/// Address at which ROMs are loaded and execution begins.
/// 0x000 - 0x1FF is reserved for the interpreter.
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between `PROGRAM_START` and the end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Address of the first glyph of the sprite sheet.
pub const SPRITE_SHEET_START: u16 = 0x050;

/// Each glyph is 5 rows of 8 pixels.
pub const SPRITE_HEIGHT: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum subroutine nesting.
pub const STACK_DEPTH: usize = 16;

/// Index of the flag register VF.
pub const FLAG: usize = 0xF;

/// Nanoseconds per CPU cycle (500Hz).
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Nanoseconds per timer tick (60Hz), independent of the CPU clock.
pub const TIMER_SPEED: u64 = 16_666_666;

/// # Sprite Sheet
/// Hexadecimal digits 0..F, each drawn in a 4x5 box in the high nibble of 5 bytes.
///
/// e.g. 0:
/// ```text
/// 0xF0 ****
/// 0x90 *  *
/// 0x90 *  *
/// 0x90 *  *
/// 0xF0 ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
