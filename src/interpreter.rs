//! Tree-walking interpreter for the language core.

mod builtins;
mod constructors;
mod data;
mod eval;
mod executors;
mod flow;
mod variables;

use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;

use crate::ast::VarName;
use crate::consts::VARIABLE_COUNT;
use crate::program::Program;
use crate::state::Mode;
use crate::value::CodyString;

/// A FOR/NEXT loop record: the loop slot and subscript, the limit, and
/// the line the FOR was stored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoopFrame {
    var: VarName,
    index: i16,
    limit: i16,
    line: u16,
}

/// Cody BASIC interpreter.
///
/// Owns the program store, the variable stores, the control stacks, and
/// the data cursor. Every side effect goes through the injected
/// [`Io`](crate::io::Io) backend, so a graphical front end and the test
/// suite drive the same core.
#[derive(Debug)]
pub struct Interpreter<I> {
    io: I,
    program: Program,
    mode: Mode,
    call_stack: Vec<u16>,
    loop_stack: Vec<LoopFrame>,
    int_vars: [BTreeMap<i16, i16>; VARIABLE_COUNT],
    string_vars: [CodyString; VARIABLE_COUNT],
    data_line: usize,
    data_values: VecDeque<i16>,
    rng: StdRng,
}

impl<I> Interpreter<I> {
    /// The injected I/O backend.
    pub fn io(&self) -> &I {
        &self.io
    }

    /// Mutable access to the I/O backend.
    pub fn io_mut(&mut self) -> &mut I {
        &mut self.io
    }

    /// Current execution mode.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The stored program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Pending GOSUB caller lines.
    pub fn call_stack(&self) -> &[u16] {
        self.call_stack.as_slice()
    }

    /// Open FOR/NEXT loop count.
    pub fn loop_depth(&self) -> usize {
        self.loop_stack.len()
    }

    /// Current value of an integer variable slot; unassigned slots read
    /// as zero.
    pub fn int_value(&self, var: VarName, index: i16) -> i16 {
        self.int_vars[var.index()].get(&index).copied().unwrap_or(0)
    }

    /// Current value of a string variable; unassigned variables read as
    /// the empty string.
    pub fn string_value(&self, var: VarName) -> &CodyString {
        &self.string_vars[var.index()]
    }

    /// Reset the volatile run state; optionally drop the stored program
    /// too (the difference between RUN and NEW).
    pub(crate) fn reset(&mut self, clear_program: bool) {
        if clear_program {
            self.program.clear();
        }

        self.mode = Mode::Repl;
        self.call_stack.clear();
        self.loop_stack.clear();

        for slots in &mut self.int_vars {
            slots.clear();
        }

        for value in &mut self.string_vars {
            *value = CodyString::new();
        }

        self.restore_data();
    }

    /// Drop control state after an error or cancellation. The program
    /// store and the variables survive.
    pub(crate) fn unwind(&mut self) {
        self.mode = Mode::Repl;
        self.call_stack.clear();
        self.loop_stack.clear();
        self.restore_data();
    }
}

impl<I> AsRef<I> for Interpreter<I> {
    fn as_ref(&self) -> &I {
        &self.io
    }
}

impl<I> AsMut<I> for Interpreter<I> {
    fn as_mut(&mut self) -> &mut I {
        &mut self.io
    }
}
