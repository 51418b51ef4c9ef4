//! Console I/O backend.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use super::Io;
use crate::consts::{JIFFIES_PER_SECOND, MAX_STRING_LEN};
use crate::error::IoError;

/// [`Io`] implementation over the process stdin/stdout.
///
/// The console has no memory map and no serial hardware: peek/poke/sys
/// stay unsupported, and while a uart is open every print and input
/// fails.
#[derive(Debug)]
pub struct StdIo {
    uart: Option<(u8, u8)>,
    started: Instant,
}

impl Default for StdIo {
    fn default() -> Self {
        Self {
            uart: None,
            started: Instant::now(),
        }
    }
}

impl StdIo {
    /// Create a backend; the jiffy clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_screen(&self, what: &'static str) -> Result<(), IoError> {
        if self.uart.is_some() {
            return Err(IoError::Unsupported(what));
        }

        Ok(())
    }
}

impl Io for StdIo {
    fn print_char(&mut self, c: char) -> Result<(), IoError> {
        self.check_screen("uart output")?;
        print!("{c}");
        Ok(())
    }

    fn println(&mut self) -> Result<(), IoError> {
        self.check_screen("uart output")?;
        println!();
        Ok(())
    }

    fn input(&mut self, prompt: &str) -> Result<String, IoError> {
        self.check_screen("uart input")?;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');

        if line.len() > MAX_STRING_LEN {
            return Err(IoError::InputTooLong);
        }

        // the console keyboard produces printable ascii only
        if let Some(c) = line.chars().find(|&c| !matches!(c, ' '..='~')) {
            return Err(IoError::InvalidInputChar(u32::from(c)));
        }

        Ok(line.to_string())
    }

    fn open_uart(&mut self, uart: u8, bit_rate: u8) -> Result<(), IoError> {
        if self.uart.is_some() {
            return Err(IoError::UartBusy);
        }

        self.uart = Some((uart, bit_rate));
        Ok(())
    }

    fn close_uart(&mut self) -> Result<(), IoError> {
        self.uart = None;
        Ok(())
    }

    fn get_time(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * JIFFIES_PER_SECOND
    }
}
