use std::io::Read;
use std::time::Duration;

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START, TIMER_SPEED};
use crate::error::VmError;
use crate::instruction::execute;
use crate::state::{FrameBuffer, Keypad, Mode, State};

/// # Machine
/// The virtual machine and its cycle driver.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - `timer_elapsed`, wall time not yet spent on timer ticks
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU
/// - advancing its timers
/// - taking its frame buffer for rendering by some display
pub struct Machine {
    state: State,
    pressed_keys: Keypad,
    timer_elapsed: Duration,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            state: State::new(),
            pressed_keys: [false; 16],
            timer_elapsed: Duration::ZERO,
        }
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader over a raw ROM image; no header, loaded as-is at 0x200
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), VmError> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        reader.read_to_end(&mut rom)?;
        if rom.len() > MAX_ROM_SIZE {
            return Err(VmError::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.state.write_slice(PROGRAM_START as usize, &rom)?;
        log::info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Returns the FrameBuffer if the display should be redrawn, lowering the draw flag
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.pressed_keys[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.pressed_keys[(key & 0xF) as usize] = false;
    }

    /// Replace the whole key matrix with a snapshot from the input source
    pub fn set_keys(&mut self, keys: Keypad) {
        self.pressed_keys = keys;
    }

    /// Advances the CPU by a single cycle
    /// - if awaiting a keypress, delivers the lowest pressed key (if any) instead of fetching
    /// - otherwise gets, decodes and executes the next opcode
    ///
    /// Returns whether the display should be redrawn. A fault leaves the state as it was before
    /// the faulting opcode.
    pub fn cycle(&mut self) -> Result<bool, VmError> {
        match self.state.mode {
            Mode::AwaitingKey(register) => self.deliver_key(register),
            Mode::Running => {
                let op = self.state.fetch()?;
                log::trace!(
                    "{:04X}: {:04X} v{:02X?} i{:04X} sp{}",
                    self.state.pc,
                    op,
                    self.state.v,
                    self.state.i,
                    self.state.sp
                );
                let mut fetched = self.state;
                fetched.pc += 0x2;
                self.state = execute(op, &fetched, &self.pressed_keys)?;
            }
        }
        Ok(self.state.draw_flag)
    }

    fn deliver_key(&mut self, register: u8) {
        if let Some(key) = self.pressed_keys.iter().position(|&pressed| pressed) {
            log::debug!("key {:X} delivered to V{:X}", key, register);
            self.state.v[register as usize] = key as u8;
            self.state.pc += 0x2;
            self.state.mode = Mode::Running;
        }
    }

    /// Runs the timers for `elapsed` wall time
    /// - decrements both timers once per whole `TIMER_SPEED` period, stopping at 0
    /// - carries the remainder over to the next call
    pub fn advance_timers(&mut self, elapsed: Duration) {
        let period = Duration::from_nanos(TIMER_SPEED);
        self.timer_elapsed += elapsed;
        while self.timer_elapsed >= period {
            self.timer_elapsed -= period;
            self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
            self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
        }
    }

    /// The current state, for inspection
    pub fn state(&self) -> &State {
        &self.state
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
