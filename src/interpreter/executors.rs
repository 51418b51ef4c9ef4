//! Command dispatch and the run loop.

use tracing::debug;

use super::eval::Evaluated;
use super::variables::Target;
use super::Interpreter;
use crate::ast::{Command, Expr, Line};
use crate::consts::{BIT_RATE_MAX, BIT_RATE_MIN, UART_MAX, UART_MIN};
use crate::error::{InterpreterError, RuntimeError};
use crate::io::Io;
use crate::parser::parse_line;
use crate::state::{ExecuteState, Mode};
use crate::util::{to_unsigned, twos_complement};
use crate::value::{CodyString, Value};

impl<I: Io> Interpreter<I> {
    /// Parse and execute one line typed at the prompt.
    pub fn execute_source(&mut self, source: &str) -> Result<(), InterpreterError> {
        let line = parse_line(source)?;
        self.execute(line)?;

        Ok(())
    }

    /// Execute a parsed line at the REPL: a numbered line edits the
    /// stored program, anything else runs immediately (and `RUN` drives
    /// the whole program before returning).
    ///
    /// After an error or cancellation the interpreter is back at the
    /// REPL with its call stack, loop stack, and data cursor cleared;
    /// the program store and the variables survive.
    pub fn execute(&mut self, line: Line) -> Result<(), RuntimeError> {
        let result = self.execute_inner(&line);

        if result.is_err() {
            self.unwind();
        }

        result
    }

    /// Replace the stored program, resetting all volatile state.
    pub fn load<L>(&mut self, lines: L)
    where
        L: IntoIterator<Item = Line>,
    {
        self.reset(true);

        for line in lines {
            self.program.store(line);
        }

        debug!(lines = self.program.len(), "program loaded");
    }

    /// Run the stored program from its lowest line.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.execute(Line {
            number: None,
            source: String::from("RUN"),
            command: Command::Run,
        })
    }

    fn execute_inner(&mut self, line: &Line) -> Result<(), RuntimeError> {
        let state = self.dispatch_line(line)?;
        self.resume(state)
    }

    /// Store a numbered line in REPL mode; dispatch anything else.
    fn dispatch_line(&mut self, line: &Line) -> Result<ExecuteState, RuntimeError> {
        if self.mode.is_repl() && line.number.is_some() {
            self.program.store(line.clone());
            // edits shift store indices under the data cursor
            self.restore_data();

            return Ok(ExecuteState::Proceed);
        }

        self.dispatch(line.number, &line.command)
    }

    /// Switch to Running and walk the program from a jumped-to line.
    fn resume(&mut self, state: ExecuteState) -> Result<(), RuntimeError> {
        let start = match state {
            ExecuteState::Jump(index) => index,
            ExecuteState::Proceed | ExecuteState::Halt => return Ok(()),
        };

        self.mode = Mode::Running;
        let result = self.run_loop(start);
        self.mode = Mode::Repl;

        result
    }

    fn run_loop(&mut self, start: usize) -> Result<(), RuntimeError> {
        let mut next = Some(start);

        while let Some(index) = next {
            let line = match self.program.get(index) {
                Some(line) => line.clone(),
                None => break,
            };

            next = match self.dispatch(line.number, &line.command)? {
                ExecuteState::Proceed => Some(index + 1).filter(|i| *i < self.program.len()),
                ExecuteState::Jump(target) => Some(target),
                ExecuteState::Halt => None,
            };
        }

        Ok(())
    }

    /// Execute a single command and report where control goes next.
    ///
    /// `number` is the stored line the command came from; a command
    /// nested under IF inherits the enclosing line's number. The cancel
    /// flag is polled once per dispatch.
    fn dispatch(
        &mut self,
        number: Option<u16>,
        command: &Command,
    ) -> Result<ExecuteState, RuntimeError> {
        if self.io.take_cancel() {
            return Err(RuntimeError::Cancelled);
        }

        match command {
            Command::Rem | Command::Empty | Command::Data(_) => Ok(ExecuteState::Proceed),

            Command::Assignment { target, value } => {
                let (target, index) = self.compute_target(target)?;
                let value = self.eval_value(value)?;
                self.store_target(target, index, value)?;

                Ok(ExecuteState::Proceed)
            }

            Command::Print { values, no_newline } => {
                for expr in values {
                    match self.eval(expr)? {
                        Evaluated::Value(value) => self.io.print(&value.to_string())?,
                        // AT and TAB move the cursor and print nothing
                        Evaluated::Nil => {}
                        other => return Err(RuntimeError::ExpectedValue(other.kind())),
                    }
                }

                if !*no_newline {
                    self.io.println()?;
                }

                Ok(ExecuteState::Proceed)
            }

            Command::Input { targets } => {
                self.require_running("INPUT")?;

                for expr in targets {
                    let (target, index) = self.compute_target(expr)?;
                    let prompt = format!("{} ", self.io.prompt_char());
                    let input = self.io.input(&prompt)?;

                    let value = match target {
                        Target::Integer(_) => {
                            let n = input
                                .trim()
                                .parse::<i64>()
                                .map_err(|_| RuntimeError::InvalidInput(input.clone()))?;
                            Value::Integer(twos_complement(n))
                        }
                        Target::String(_) => Value::String(CodyString::try_from(input.as_str())?),
                    };

                    self.store_target(target, index, value)?;
                }

                Ok(ExecuteState::Proceed)
            }

            Command::If { condition, then } => {
                if self.eval_condition(condition)? {
                    // only jumps propagate; a nested halt falls through
                    if let state @ ExecuteState::Jump(_) = self.dispatch(number, then)? {
                        return Ok(state);
                    }
                }

                Ok(ExecuteState::Proceed)
            }

            Command::Goto(target) => {
                self.require_running("GOTO")?;
                let target = self.eval_int(target)?;
                self.jump_to(target)
            }

            Command::Gosub(target) => self.gosub(number, target),

            Command::Return => self.return_from(),

            Command::End => {
                self.require_running("END")?;
                Ok(ExecuteState::Halt)
            }

            Command::For {
                variable,
                initial,
                limit,
            } => {
                self.enter_loop(number, variable, initial, limit)?;
                Ok(ExecuteState::Proceed)
            }

            Command::Next => self.next_loop(),

            Command::Read { targets } => {
                for expr in targets {
                    let (target, index) = self.compute_target(expr)?;

                    if !matches!(target, Target::Integer(_)) {
                        return Err(RuntimeError::ReadTarget);
                    }

                    let value = self.read_next_data_value()?;
                    self.store_target(target, index, Value::Integer(value))?;
                }

                Ok(ExecuteState::Proceed)
            }

            Command::Restore => {
                self.restore_data();
                Ok(ExecuteState::Proceed)
            }

            Command::Poke { address, value } => {
                let address = to_unsigned(i64::from(self.eval_int(address)?));
                let value = to_unsigned(i64::from(self.eval_int(value)?)) as u8;
                self.io.poke(address, value)?;

                Ok(ExecuteState::Proceed)
            }

            Command::Sys(address) => {
                let address = to_unsigned(i64::from(self.eval_int(address)?));
                self.io.sys(address)?;

                Ok(ExecuteState::Proceed)
            }

            Command::Open { uart, bit_rate } => {
                self.require_running("OPEN")?;
                let uart = self.eval_uart(uart)?;
                let bit_rate = self.eval_int(bit_rate)?;

                if !(BIT_RATE_MIN..=BIT_RATE_MAX).contains(&bit_rate) {
                    return Err(RuntimeError::BitRateRange(bit_rate));
                }

                self.io.open_uart(uart, bit_rate as u8)?;
                Ok(ExecuteState::Proceed)
            }

            Command::Close => {
                self.require_running("CLOSE")?;
                self.io.close_uart()?;

                Ok(ExecuteState::Proceed)
            }

            Command::Load { uart, mode } => {
                self.require_repl("LOAD")?;
                let uart = self.eval_uart(uart)?;
                let mode = self.eval_int(mode)?;

                match mode {
                    0 => {
                        let text = self.io.load_text(uart)?;
                        let mut lines = Vec::with_capacity(text.len());

                        for source in &text {
                            lines.push(parse_line(source)?);
                        }

                        self.load(lines);
                        Ok(ExecuteState::Proceed)
                    }
                    1 => Err(RuntimeError::BinaryTransfer),
                    _ => Err(RuntimeError::TransferMode(mode)),
                }
            }

            Command::Save { uart } => {
                self.require_repl("SAVE")?;
                let uart = self.eval_uart(uart)?;

                let sources: Vec<&str> = self
                    .program
                    .lines()
                    .iter()
                    .map(|line| line.source.as_str())
                    .collect();

                self.io.save_text(uart, &sources)?;
                Ok(ExecuteState::Proceed)
            }

            Command::New => {
                self.require_repl("NEW")?;
                self.reset(true);

                Ok(ExecuteState::Proceed)
            }

            Command::Run => {
                self.require_repl("RUN")?;
                self.reset(false);
                debug!(lines = self.program.len(), "run");

                // an empty program falls straight out of the run loop
                Ok(ExecuteState::Jump(0))
            }

            Command::List { start, end } => {
                self.require_repl("LIST")?;

                let start = match start {
                    Some(expr) => Some(i64::from(self.eval_int(expr)?)),
                    None => None,
                };
                let end = match end {
                    Some(expr) => Some(i64::from(self.eval_int(expr)?)),
                    None => None,
                };

                for line in self.program.lines() {
                    let number = line.number.map(i64::from).unwrap_or_default();

                    if start.map_or(true, |s| s <= number) && end.map_or(true, |e| number <= e) {
                        self.io.print(&line.source)?;
                        self.io.println()?;
                    }
                }

                Ok(ExecuteState::Proceed)
            }
        }
    }

    /// Evaluate and range-check a uart channel operand.
    fn eval_uart(&mut self, expr: &Expr) -> Result<u8, RuntimeError> {
        let uart = self.eval_int(expr)?;

        if !(UART_MIN..=UART_MAX).contains(&uart) {
            return Err(RuntimeError::UartRange(uart));
        }

        Ok(uart as u8)
    }
}
