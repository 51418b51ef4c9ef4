//! Exposed constructors API for the [`Interpreter`].

use std::array;
use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::Interpreter;
use crate::io::{MemoryIo, StdIo};
use crate::program::Program;
use crate::state::Mode;
use crate::value::CodyString;

impl<I> Interpreter<I> {
    /// Create an interpreter over the provided I/O backend.
    pub fn with_io(io: I) -> Self {
        Self {
            io,
            program: Program::new(),
            mode: Mode::Repl,
            call_stack: Vec::new(),
            loop_stack: Vec::new(),
            int_vars: array::from_fn(|_| BTreeMap::new()),
            string_vars: array::from_fn(|_| CodyString::new()),
            data_line: 0,
            data_values: VecDeque::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Recover the I/O backend, dropping the interpreter state.
    pub fn into_io(self) -> I {
        self.io
    }
}

impl<I: Default> Default for Interpreter<I> {
    fn default() -> Self {
        Self::with_io(I::default())
    }
}

impl Interpreter<MemoryIo> {
    /// Create an interpreter over in-memory buffers; the backend the
    /// test suites drive.
    pub fn with_memory_io() -> Self {
        Self::default()
    }
}

impl Interpreter<StdIo> {
    /// Create an interpreter over the process console.
    pub fn with_stdio() -> Self {
        Self::default()
    }
}
