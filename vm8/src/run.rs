use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use vm8_core::constants::CLOCK_SPEED;
use vm8_core::{Machine, VmError};
use vm8_display::{Display, Input, Poll};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("unable to load {}: {source}", path.display())]
    Load { path: PathBuf, source: VmError },

    #[error("machine halted: {0}")]
    Vm(#[from] VmError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Builds a machine with the ROM at `rom` loaded.
pub fn load(rom: &Path) -> Result<Machine, RunError> {
    let wrap = |source: VmError| RunError::Load {
        path: rom.to_path_buf(),
        source,
    };
    let file = File::open(rom).map_err(|e| wrap(e.into()))?;
    let mut reader = BufReader::new(file);
    let mut machine = Machine::new();
    machine.load_rom(&mut reader).map_err(wrap)?;
    Ok(machine)
}

/// Drives the machine until the user quits or it faults.
pub fn run(mut machine: Machine) -> Result<(), RunError> {
    let mut display = Display::new()?;
    let mut input = Input::new();

    // Set initial timing
    let cycle_time = Duration::from_nanos(CLOCK_SPEED);
    let mut last_cycle = Instant::now();
    let mut last_timer = last_cycle;

    loop {
        // Handle input
        if input.poll()? == Poll::Quit {
            log::info!("quit requested");
            return Ok(());
        }
        machine.set_keys(input.keys());

        // Update state
        let result = machine.cycle();
        if let Err(e) = &result {
            log::error!("{} (pc {:04X})", e, machine.state().pc);
        }
        result?;

        // Timers follow the wall clock, however long the cycle took
        let now = Instant::now();
        machine.advance_timers(now - last_timer);
        last_timer = now;

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = machine.take_frame() {
            display.render(frame)?;
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("missing.ch8"));
        assert!(matches!(
            result,
            Err(RunError::Load {
                source: VmError::Io(_),
                ..
            })
        ));
    }

    #[test]
    fn test_load_reads_rom() {
        let mut rom = NamedTempFile::new().unwrap();
        rom.write_all(&[0x60, 0x2A]).unwrap();
        let mut machine = load(rom.path()).unwrap();
        machine.cycle().unwrap();
        assert_eq!(machine.state().v[0x0], 0x2A);
    }

    #[test]
    fn test_load_oversized_rom() {
        let mut rom = NamedTempFile::new().unwrap();
        rom.write_all(&[0u8; 4096]).unwrap();
        let result = load(rom.path());
        assert!(matches!(
            result,
            Err(RunError::Load {
                source: VmError::RomTooLarge { size: 4096, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_load_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ch8");
        let message = load(&path).err().unwrap().to_string();
        assert!(message.contains("missing.ch8"), "{}", message);
    }
}
