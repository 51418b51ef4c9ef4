//! I/O contract between the interpreter core and its host machine.

use crate::consts::*;
use crate::error::IoError;

mod memory;
mod stdio;

pub use memory::MemoryIo;
pub use stdio::StdIo;

/// Surface the interpreter requires from the emulated machine: screen,
/// keyboard, serial channels, memory map, and timer.
///
/// Screen controls and the memory map default to failing with
/// [`IoError::Unsupported`]; a backend implements what its hardware has.
pub trait Io {
    /// Emit one code point to the current sink.
    fn print_char(&mut self, c: char) -> Result<(), IoError>;

    /// Terminate the current output line.
    fn println(&mut self) -> Result<(), IoError>;

    /// Blocking read of one input line from the current sink, at most
    /// 255 bytes.
    fn input(&mut self, prompt: &str) -> Result<String, IoError>;

    /// Erase the screen and home the cursor.
    fn clear_screen(&mut self) -> Result<(), IoError> {
        Err(IoError::Unsupported("clear_screen"))
    }

    /// Toggle reversed character rendering.
    fn reverse_field(&mut self) -> Result<(), IoError> {
        Err(IoError::Unsupported("reverse_field"))
    }

    /// Select the background color, `0..16`.
    fn set_background_color(&mut self, color: u8) -> Result<(), IoError> {
        let _ = color;
        Err(IoError::Unsupported("set_background_color"))
    }

    /// Select the foreground color, `0..16`.
    fn set_foreground_color(&mut self, color: u8) -> Result<(), IoError> {
        let _ = color;
        Err(IoError::Unsupported("set_foreground_color"))
    }

    /// Move the cursor to a column and row.
    fn print_at(&mut self, col: i16, row: i16) -> Result<(), IoError> {
        let _ = (col, row);
        Err(IoError::Unsupported("print_at"))
    }

    /// Advance the cursor to a column.
    fn print_tab(&mut self, col: i16) -> Result<(), IoError> {
        let _ = col;
        Err(IoError::Unsupported("print_tab"))
    }

    /// Switch the I/O sink to a serial channel. Only one channel may be
    /// open at a time; the executor validates the argument ranges.
    fn open_uart(&mut self, uart: u8, bit_rate: u8) -> Result<(), IoError>;

    /// Switch the I/O sink back to the screen and keyboard.
    fn close_uart(&mut self) -> Result<(), IoError>;

    /// Byte at an address of the memory map.
    fn peek(&mut self, address: u16) -> Result<u8, IoError> {
        let _ = address;
        Err(IoError::Unsupported("peek"))
    }

    /// Store a byte into the memory map. Backends may reject read-only
    /// regions.
    fn poke(&mut self, address: u16, value: u8) -> Result<(), IoError> {
        let _ = (address, value);
        Err(IoError::Unsupported("poke"))
    }

    /// Call machine code at an address.
    fn sys(&mut self, address: u16) -> Result<(), IoError> {
        let _ = address;
        Err(IoError::Unsupported("sys"))
    }

    /// Monotonic time in jiffies (1/60 s).
    fn get_time(&self) -> f64;

    /// Read and clear the cooperative cancel flag. Polled once per
    /// command dispatch.
    fn take_cancel(&mut self) -> bool {
        false
    }

    /// Prompt character INPUT prefixes to its reads.
    fn prompt_char(&self) -> char {
        PROMPT_CHAR
    }

    /// Emit a string, decoding screen metacodes per code point.
    fn print(&mut self, s: &str) -> Result<(), IoError> {
        for c in s.chars() {
            match u8::try_from(u32::from(c)) {
                Ok(CODE_NEWLINE) => self.println()?,
                Ok(CODE_CLEAR_SCREEN) => self.clear_screen()?,
                Ok(CODE_REVERSE_FIELD) => self.reverse_field()?,
                Ok(code @ CODE_BACKGROUND_BASE..=CODE_BACKGROUND_LAST) => {
                    self.set_background_color(code - CODE_BACKGROUND_BASE)?
                }
                Ok(code @ CODE_FOREGROUND_BASE..=CODE_FOREGROUND_LAST) => {
                    self.set_foreground_color(code - CODE_FOREGROUND_BASE)?
                }
                _ => self.print_char(c)?,
            }
        }

        Ok(())
    }

    /// Read program lines from a serial channel until a blank line
    /// (text-mode LOAD). The channel is closed again even on failure.
    fn load_text(&mut self, uart: u8) -> Result<Vec<String>, IoError> {
        self.open_uart(uart, TEXT_TRANSFER_BIT_RATE)?;

        let mut lines = Vec::new();
        let result = loop {
            match self.input("?") {
                Ok(line) if line.is_empty() => break Ok(()),
                Ok(line) => lines.push(line),
                Err(e) => break Err(e),
            }
        };

        self.close_uart()?;

        result.map(|_| lines)
    }

    /// Stream program lines to a serial channel (text-mode SAVE). The
    /// channel is closed again even on failure.
    fn save_text(&mut self, uart: u8, lines: &[&str]) -> Result<(), IoError> {
        self.open_uart(uart, TEXT_TRANSFER_BIT_RATE)?;

        let mut result = Ok(());
        for line in lines {
            result = self.print(line).and_then(|_| self.println());

            if result.is_err() {
                break;
            }
        }

        self.close_uart()?;

        result
    }
}
