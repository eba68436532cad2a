use std::io::{self, Stdout, Write};

use crossterm::{cursor, execute, queue, style::Print, terminal};

use vm8_core::constants::DISPLAY_HEIGHT;
use vm8_core::FrameBuffer;

const PIXEL_ON: char = '█';
const PIXEL_OFF: char = ' ';

/// # Display
/// The display is composed of 64x32 black/white pixels, drawn in a terminal one character per
/// pixel.
/// The display only gets a call to `render` when the machine's FrameBuffer is updated.
///
/// Taking over the terminal switches to the alternate screen, hides the cursor and enables raw
/// mode; dropping the display restores all three.
pub struct Display {
    out: Stdout,
}

impl Display {
    /// Creates a new display that owns the terminal until dropped.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // from here on dropping the display puts the terminal back
        let mut display = Display { out: io::stdout() };
        execute!(
            display.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;

        Ok(display)
    }

    /// Formats a FrameBuffer as one line of text per row.
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    fn frame_to_lines(frame: &FrameBuffer) -> Vec<String> {
        frame
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&on| if on { PIXEL_ON } else { PIXEL_OFF })
                    .collect::<String>()
            })
            .collect()
    }

    /// Draws the FrameBuffer over the previous frame.
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        for (y, line) in Self::frame_to_lines(frame).iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16), Print(line))?;
        }
        // leave the cursor below the frame so stray output doesn't land on it
        queue!(self.out, cursor::MoveTo(0, DISPLAY_HEIGHT as u16))?;
        self.out.flush()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen) {
            log::warn!("failed to restore terminal screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to leave raw mode: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_lines() {
        let mut frame: FrameBuffer = [[false; 64]; 32];
        frame[0][0..2].copy_from_slice(&[false, true]);
        frame[1][0..2].copy_from_slice(&[true, false]);
        let lines = Display::frame_to_lines(&frame);

        assert_eq!(lines.len(), 32);
        assert!(lines.iter().all(|line| line.chars().count() == 64));
        assert!(lines[0].starts_with(" █ "));
        assert!(lines[1].starts_with("█  "));
        assert_eq!(lines[2], " ".repeat(64));
    }
}
