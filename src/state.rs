//! Execution state representation.

/// Control transfer produced by dispatching a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteState {
    /// Continue with the next stored line in sorted order.
    Proceed,
    /// Transfer control to the stored line at this store index.
    Jump(usize),
    /// Stop the running program.
    Halt,
}

impl ExecuteState {
    /// Return `true` for a control transfer to another line.
    pub const fn is_jump(&self) -> bool {
        matches!(self, Self::Jump(_))
    }
}

impl Default for ExecuteState {
    fn default() -> Self {
        Self::Proceed
    }
}

/// Interpreter execution mode.
///
/// Commands typed at the prompt execute in `Repl`; `RUN` switches to
/// `Running` until the program halts, errs, or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Awaiting immediate commands.
    #[default]
    Repl,
    /// Driving the stored program.
    Running,
}

impl Mode {
    /// Return `true` in immediate mode.
    pub const fn is_repl(&self) -> bool {
        matches!(self, Self::Repl)
    }

    /// Return `true` while a program runs.
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}
