//! Expression evaluation.

use super::Interpreter;
use crate::ast::{BinaryOp, Expr};
use crate::error::RuntimeError;
use crate::io::Io;
use crate::util::{floor_div, twos_complement};
use crate::value::{CodyString, Value};

/// Result of evaluating one AST node.
///
/// Conditions and cursor moves are not values: only IF consumes a
/// boolean, and PRINT drops `Nil`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Evaluated {
    Value(Value),
    Bool(bool),
    Nil,
}

impl Evaluated {
    /// Kind name used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Value(value) => value.kind(),
            Self::Bool(_) => "a condition",
            Self::Nil => "nothing",
        }
    }
}

impl<I: Io> Interpreter<I> {
    pub(crate) fn eval(&mut self, expr: &Expr) -> Result<Evaluated, RuntimeError> {
        match expr {
            Expr::IntegerLiteral(n) => Ok(Evaluated::Value(Value::Integer(*n))),
            Expr::StringLiteral(s) => Ok(Evaluated::Value(Value::String(s.clone()))),
            Expr::IntegerVariable(_) | Expr::StringVariable(_) | Expr::Array { .. } => {
                let (target, index) = self.compute_target(expr)?;
                Ok(Evaluated::Value(self.load_target(target, index)))
            }
            Expr::BuiltInVariable(var) => self.eval_builtin_var(*var),
            Expr::BuiltInCall { function, args } => self.eval_builtin_call(*function, args),
            Expr::UnaryMinus(inner) => {
                let n = self.eval_int(inner)?;
                Ok(Evaluated::Value(Value::Integer(twos_complement(
                    -i64::from(n),
                ))))
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Relation { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;

                let ord = match (&left, &right) {
                    (
                        Evaluated::Value(Value::Integer(a)),
                        Evaluated::Value(Value::Integer(b)),
                    ) => a.cmp(b),
                    (
                        Evaluated::Value(Value::String(a)),
                        Evaluated::Value(Value::String(b)),
                    ) => a.cmp(b),
                    (Evaluated::Bool(a), Evaluated::Bool(b)) => a.cmp(b),
                    _ => {
                        return Err(RuntimeError::MixedOperands {
                            left: left.kind(),
                            right: right.kind(),
                        })
                    }
                };

                Ok(Evaluated::Bool(op.test(ord)))
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Evaluated, RuntimeError> {
        // addition doubles as string concatenation
        if let BinaryOp::Add = op {
            let left = self.eval_value(left)?;
            let right = self.eval_value(right)?;

            let value = match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => {
                    Value::Integer(twos_complement(i64::from(a) + i64::from(b)))
                }
                (Value::String(a), Value::String(b)) => Value::String(a.concat(&b)?),
                (left, right) => {
                    return Err(RuntimeError::MixedOperands {
                        left: left.kind(),
                        right: right.kind(),
                    })
                }
            };

            return Ok(Evaluated::Value(value));
        }

        let a = i64::from(self.eval_int(left)?);
        let b = i64::from(self.eval_int(right)?);

        let result = match op {
            BinaryOp::Add => unreachable!("handled above"),
            BinaryOp::Sub => twos_complement(a - b),
            BinaryOp::Mul => twos_complement(a * b),
            BinaryOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }

                twos_complement(floor_div(a, b))
            }
        };

        Ok(Evaluated::Value(Value::Integer(result)))
    }

    /// Evaluate and require a plain value.
    pub(crate) fn eval_value(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match self.eval(expr)? {
            Evaluated::Value(value) => Ok(value),
            other => Err(RuntimeError::ExpectedValue(other.kind())),
        }
    }

    /// Evaluate and require an integer.
    pub(crate) fn eval_int(&mut self, expr: &Expr) -> Result<i16, RuntimeError> {
        match self.eval(expr)? {
            Evaluated::Value(Value::Integer(n)) => Ok(n),
            other => Err(RuntimeError::ExpectedInteger(other.kind())),
        }
    }

    /// Evaluate and require a string.
    pub(crate) fn eval_string(&mut self, expr: &Expr) -> Result<CodyString, RuntimeError> {
        match self.eval(expr)? {
            Evaluated::Value(Value::String(s)) => Ok(s),
            other => Err(RuntimeError::ExpectedString(other.kind())),
        }
    }

    /// Evaluate an IF condition.
    pub(crate) fn eval_condition(&mut self, expr: &Expr) -> Result<bool, RuntimeError> {
        match self.eval(expr)? {
            Evaluated::Bool(b) => Ok(b),
            _ => Err(RuntimeError::ExpectedCondition),
        }
    }
}
