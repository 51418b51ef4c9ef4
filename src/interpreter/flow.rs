//! Control flow: jumps, subroutine calls, and FOR/NEXT loops.

use super::variables::Target;
use super::{Interpreter, LoopFrame};
use crate::ast::Expr;
use crate::error::RuntimeError;
use crate::io::Io;
use crate::state::ExecuteState;

impl<I: Io> Interpreter<I> {
    /// Fail unless a program is running.
    pub(crate) fn require_running(&self, command: &'static str) -> Result<(), RuntimeError> {
        if self.mode.is_running() {
            Ok(())
        } else {
            Err(RuntimeError::RequiresRunning(command))
        }
    }

    /// Fail unless at the REPL.
    pub(crate) fn require_repl(&self, command: &'static str) -> Result<(), RuntimeError> {
        if self.mode.is_repl() {
            Ok(())
        } else {
            Err(RuntimeError::RequiresRepl(command))
        }
    }

    /// Resolve an exact jump target to a store index.
    pub(crate) fn jump_to(&self, target: i16) -> Result<ExecuteState, RuntimeError> {
        u16::try_from(target)
            .ok()
            .and_then(|number| self.program.index_of(number))
            .map(ExecuteState::Jump)
            .ok_or(RuntimeError::UnknownLine(target))
    }

    /// First line strictly after `number`; running off the end halts.
    pub(crate) fn continue_after(&self, number: u16) -> ExecuteState {
        match self.program.index_after(number) {
            Some(index) => ExecuteState::Jump(index),
            None => ExecuteState::Halt,
        }
    }

    /// Push the caller line and jump to the subroutine.
    pub(crate) fn gosub(
        &mut self,
        number: Option<u16>,
        target: &Expr,
    ) -> Result<ExecuteState, RuntimeError> {
        self.require_running("GOSUB")?;
        let caller = number.ok_or(RuntimeError::RequiresRunning("GOSUB"))?;

        let target = self.eval_int(target)?;
        let state = self.jump_to(target)?;
        self.call_stack.push(caller);

        Ok(state)
    }

    /// Pop the caller line and resume at the first line strictly after
    /// it.
    pub(crate) fn return_from(&mut self) -> Result<ExecuteState, RuntimeError> {
        self.require_running("RETURN")?;

        let caller = self
            .call_stack
            .pop()
            .ok_or(RuntimeError::ReturnWithoutGosub)?;

        Ok(self.continue_after(caller))
    }

    /// Assign the loop variable its initial value and push a loop frame.
    /// The initial value must lie strictly below the limit.
    pub(crate) fn enter_loop(
        &mut self,
        number: Option<u16>,
        variable: &Expr,
        initial: &Expr,
        limit: &Expr,
    ) -> Result<(), RuntimeError> {
        self.require_running("FOR")?;
        let line = number.ok_or(RuntimeError::RequiresRunning("FOR"))?;

        let (target, index) = self.compute_target(variable)?;
        let var = match target {
            Target::Integer(var) => var,
            Target::String(_) => return Err(RuntimeError::LoopVariable),
        };

        let initial = self.eval_int(initial)?;
        self.store_int(var, index, initial);

        let limit = self.eval_int(limit)?;

        if initial >= limit {
            return Err(RuntimeError::ForBounds { initial, limit });
        }

        self.loop_stack.push(LoopFrame {
            var,
            index,
            limit,
            line,
        });

        Ok(())
    }

    /// Step the innermost loop: pop once the variable reached the limit,
    /// else increment it and jump behind the FOR line. The variable name
    /// is not checked against the FOR.
    pub(crate) fn next_loop(&mut self) -> Result<ExecuteState, RuntimeError> {
        self.require_running("NEXT")?;

        let frame = *self.loop_stack.last().ok_or(RuntimeError::NextWithoutFor)?;
        let current = self.int_value(frame.var, frame.index);

        if current >= frame.limit {
            self.loop_stack.pop();
            return Ok(ExecuteState::Proceed);
        }

        self.store_int(frame.var, frame.index, current + 1);
        Ok(self.continue_after(frame.line))
    }
}
