//! DATA channel: the cursor READ walks and RESTORE resets.

use super::Interpreter;
use crate::ast::Command;
use crate::error::RuntimeError;
use crate::io::Io;

impl<I> Interpreter<I> {
    /// Reset the cursor to the top of the program and drop buffered
    /// values.
    pub(crate) fn restore_data(&mut self) {
        self.data_line = 0;
        self.data_values.clear();
    }
}

impl<I: Io> Interpreter<I> {
    /// Next value under the cursor.
    ///
    /// When the buffered values of the current DATA line run out, the
    /// cursor walks forward through the program to the next DATA line and
    /// evaluates its values on demand. Walking past the last line fails.
    pub(crate) fn read_next_data_value(&mut self) -> Result<i16, RuntimeError> {
        if let Some(value) = self.data_values.pop_front() {
            return Ok(value);
        }

        while self.data_line < self.program.len() {
            let index = self.data_line;
            self.data_line += 1;

            let values = match self.program.get(index).map(|line| &line.command) {
                Some(Command::Data(values)) if !values.is_empty() => values.clone(),
                _ => continue,
            };

            for expr in &values {
                let value = self.eval_int(expr)?;
                self.data_values.push_back(value);
            }

            break;
        }

        self.data_values.pop_front().ok_or(RuntimeError::OutOfData)
    }
}
