//! Variable stores and assignment targets.

use super::Interpreter;
use crate::ast::{Expr, VarName};
use crate::error::RuntimeError;
use crate::io::Io;
use crate::value::Value;

/// A resolved store slot: one of the 26 integer arrays or one of the 26
/// scalar strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Integer(VarName),
    String(VarName),
}

impl<I: Io> Interpreter<I> {
    /// Resolve an lvalue expression to a slot and subscript. A bare name
    /// is subscript zero.
    pub(crate) fn compute_target(&mut self, expr: &Expr) -> Result<(Target, i16), RuntimeError> {
        match expr {
            Expr::IntegerVariable(var) => Ok((Target::Integer(*var), 0)),
            Expr::StringVariable(var) => Ok((Target::String(*var), 0)),
            Expr::Array { var, index } => {
                let index = self.eval_int(index)?;
                Ok((Target::Integer(*var), index))
            }
            _ => Err(RuntimeError::InvalidTarget),
        }
    }

    /// Read a slot. Unassigned slots read as zero or the empty string.
    pub(crate) fn load_target(&self, target: Target, index: i16) -> Value {
        match target {
            Target::Integer(var) => Value::Integer(self.int_value(var, index)),
            Target::String(var) => Value::String(self.string_vars[var.index()].clone()),
        }
    }

    /// Write a slot, checking the value kind against the slot kind.
    pub(crate) fn store_target(
        &mut self,
        target: Target,
        index: i16,
        value: Value,
    ) -> Result<(), RuntimeError> {
        match (target, value) {
            (Target::Integer(var), Value::Integer(n)) => {
                self.int_vars[var.index()].insert(index, n);
                Ok(())
            }
            (Target::String(var), Value::String(s)) => {
                self.string_vars[var.index()] = s;
                Ok(())
            }
            (Target::Integer(_), value) => Err(RuntimeError::ExpectedInteger(value.kind())),
            (Target::String(_), value) => Err(RuntimeError::ExpectedString(value.kind())),
        }
    }

    /// Write an integer slot directly.
    pub(crate) fn store_int(&mut self, var: VarName, index: i16, value: i16) {
        self.int_vars[var.index()].insert(index, value);
    }
}
