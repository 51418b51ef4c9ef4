//! Built-in function and variable evaluation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::eval::Evaluated;
use super::Interpreter;
use crate::ast::{BuiltIn, BuiltInVar, Expr};
use crate::error::RuntimeError;
use crate::io::Io;
use crate::util::{floor_mod, isqrt, to_unsigned, twos_complement};
use crate::value::{CodyString, Value};

impl<I: Io> Interpreter<I> {
    pub(crate) fn eval_builtin_var(&mut self, var: BuiltInVar) -> Result<Evaluated, RuntimeError> {
        match var {
            BuiltInVar::Ti => {
                let jiffies = self.io.get_time() as i64;
                Ok(Evaluated::Value(Value::Integer(twos_complement(jiffies))))
            }
        }
    }

    /// Arity is part of the dispatch: a call that matches no arm is a
    /// wrong-argument-count error.
    pub(crate) fn eval_builtin_call(
        &mut self,
        function: BuiltIn,
        args: &[Expr],
    ) -> Result<Evaluated, RuntimeError> {
        let value = match (function, args) {
            (BuiltIn::Abs, [n]) => {
                let n = i64::from(self.eval_int(n)?);
                Value::Integer(twos_complement(n.abs()))
            }
            (BuiltIn::Sqr, [n]) => {
                let n = self.eval_int(n)?;

                if n < 0 {
                    return Err(RuntimeError::NegativeSqrt(n));
                }

                Value::Integer(twos_complement(isqrt(i64::from(n))))
            }
            (BuiltIn::Mod, [a, b]) => {
                let a = i64::from(self.eval_int(a)?);
                let b = i64::from(self.eval_int(b)?);

                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }

                Value::Integer(twos_complement(floor_mod(a, b)))
            }
            (BuiltIn::Rnd, []) => Value::Integer(i16::from(self.rng.gen::<u8>())),
            (BuiltIn::Rnd, [seed]) => {
                let seed = self.eval_int(seed)?;

                // zero asks for a fresh entropy seed; anything else
                // restarts a reproducible sequence
                self.rng = if seed == 0 {
                    StdRng::from_entropy()
                } else {
                    StdRng::seed_from_u64(u64::from(to_unsigned(i64::from(seed))))
                };

                Value::Integer(i16::from(self.rng.gen::<u8>()))
            }
            (BuiltIn::Not, [n]) => Value::Integer(!self.eval_int(n)?),
            (BuiltIn::And, [a, b]) => Value::Integer(self.eval_int(a)? & self.eval_int(b)?),
            (BuiltIn::Or, [a, b]) => Value::Integer(self.eval_int(a)? | self.eval_int(b)?),
            (BuiltIn::Xor, [a, b]) => Value::Integer(self.eval_int(a)? ^ self.eval_int(b)?),
            (BuiltIn::Sub, [s, start, len]) => {
                let s = self.eval_string(s)?;
                let start = i64::from(self.eval_int(start)?);
                let len = i64::from(self.eval_int(len)?);
                let total = s.len() as i64;

                // strict upper bounds: the trailing byte stays unreachable
                if !(0 <= start && start < total && 0 <= len && len < total - start) {
                    return Err(RuntimeError::SubstringBounds);
                }

                Value::String(s.slice(start as usize, len as usize))
            }
            (BuiltIn::Chr, args) => {
                let mut bytes = Vec::with_capacity(args.len());

                for arg in args {
                    let code = self.eval_int(arg)?;
                    let code =
                        u8::try_from(code).map_err(|_| RuntimeError::CodePointRange(code))?;
                    bytes.push(code);
                }

                Value::String(CodyString::from_bytes(bytes)?)
            }
            (BuiltIn::Str, [n]) => {
                let n = self.eval_int(n)?;
                Value::String(CodyString::from_bytes(n.to_string().into_bytes())?)
            }
            (BuiltIn::Val, [s]) => {
                let s = self.eval_string(s)?;
                Value::Integer(parse_leading_int(s.bytes()))
            }
            (BuiltIn::Len, [s]) => Value::Integer(self.eval_string(s)?.len() as i16),
            (BuiltIn::Asc, [s]) => {
                let s = self.eval_string(s)?;
                Value::Integer(s.first().map(i16::from).unwrap_or(0))
            }
            (BuiltIn::Peek, [address]) => {
                let address = to_unsigned(i64::from(self.eval_int(address)?));
                Value::Integer(i16::from(self.io.peek(address)?))
            }
            (BuiltIn::At, [col, row]) => {
                let col = self.eval_int(col)?;
                let row = self.eval_int(row)?;
                self.io.print_at(col, row)?;

                return Ok(Evaluated::Nil);
            }
            (BuiltIn::Tab, [col]) => {
                let col = self.eval_int(col)?;
                self.io.print_tab(col)?;

                return Ok(Evaluated::Nil);
            }
            _ => return Err(RuntimeError::BuiltInArity(function.name())),
        };

        Ok(Evaluated::Value(value))
    }
}

/// Leading optional minus and digit run, wrapped modulo 2^16 like every
/// other integer; no digits parse as zero.
fn parse_leading_int(bytes: &[u8]) -> i16 {
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: u16 = 0;

    for b in digits {
        match (*b as char).to_digit(10) {
            Some(d) => value = value.wrapping_mul(10).wrapping_add(d as u16),
            None => break,
        }
    }

    let magnitude = i64::from(value);
    twos_complement(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::parse_leading_int;

    #[test]
    fn leading_integer_prefixes() {
        assert_eq!(parse_leading_int(b""), 0);
        assert_eq!(parse_leading_int(b"-"), 0);
        assert_eq!(parse_leading_int(b"42"), 42);
        assert_eq!(parse_leading_int(b"-17 REST"), -17);
        assert_eq!(parse_leading_int(b"12X34"), 12);
        assert_eq!(parse_leading_int(b"65536"), 0);
        assert_eq!(parse_leading_int(b"32768"), -32768);
    }
}
