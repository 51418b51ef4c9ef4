//! Interpreter error implementation.

use std::io;

use thiserror::Error;

/// Errors that reject a whole source line during parsing. A failed parse
/// never produces a partial command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No keyword matched and the line is not an assignment.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A multi-letter name matched no built-in.
    #[error("unknown built-in {0}")]
    UnknownBuiltIn(String),
    /// The line ended where a token was required.
    #[error("unexpected end of line")]
    UnexpectedEnd,
    /// A character no grammar rule accepts.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    /// A specific token was required.
    #[error("expected {0}")]
    Expected(&'static str),
    /// Input remained after a complete command.
    #[error("expected end of line, found {0:?}")]
    TrailingInput(String),
    /// Line numbers stop at 65534.
    #[error("line number {0} out of range")]
    LineNumberRange(u32),
    /// A program listing line without a line number.
    #[error("program line requires a line number")]
    MissingLineNumber,
    /// String literals hold at most 255 characters.
    #[error("string literal exceeds 255 characters")]
    StringTooLong,
    /// The closing quote never arrived.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A literal character outside the 8-bit code page.
    #[error("invalid character with code point {0}")]
    InvalidCodePoint(u32),
    /// The left side of an assignment, or an INPUT/READ target, must be
    /// a variable or an array subscript.
    #[error("invalid assignment target")]
    InvalidTarget,
    /// IF conditions are relational expressions.
    #[error("expected a relational operator in IF condition")]
    ExpectedRelation,
    /// DATA holds integer literals, optionally under a leading minus.
    #[error("DATA accepts integer literals only")]
    InvalidDataValue,
    /// A command required a nonempty operand list.
    #[error("expected a list of operands")]
    ExpectedOperands,
    /// Array subscripts are single expressions.
    #[error("array index must be a single expression")]
    ArrayIndex,
    /// LIST takes zero, one, or two bounds.
    #[error("LIST accepts at most two bounds")]
    ListBounds,
}

/// Errors surfaced by an [`Io`](crate::io::Io) backend.
#[derive(Debug, Error)]
pub enum IoError {
    /// The backend does not implement the requested operation.
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
    /// A serial channel is already open.
    #[error("uart channel is already open")]
    UartBusy,
    /// A write into the ROM window.
    #[error("write to read-only address {0:#06x}")]
    ReadOnlyAddress(u16),
    /// The scripted input queue ran dry.
    #[error("input exhausted")]
    InputExhausted,
    /// An input line longer than a string value can hold.
    #[error("input exceeds 255 bytes")]
    InputTooLong,
    /// An input character outside the accepted range.
    #[error("invalid input character with code point {0}")]
    InvalidInputChar(u32),
    /// Host I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Runtime errors: anything that halts a running program or fails an
/// immediate command.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /* type errors */
    /// An integer operand was required.
    #[error("expected an integer value, found {0}")]
    ExpectedInteger(&'static str),
    /// A string operand was required.
    #[error("expected a string value, found {0}")]
    ExpectedString(&'static str),
    /// A plain value was required, not a condition or a cursor move.
    #[error("expected a value, found {0}")]
    ExpectedValue(&'static str),
    /// Operand kinds of a comparison or addition do not match.
    #[error("cannot combine {left} with {right}")]
    MixedOperands {
        left: &'static str,
        right: &'static str,
    },
    /// IF requires a relational condition.
    #[error("expected a condition")]
    ExpectedCondition,
    /// Assignment into something that is not a variable.
    #[error("cannot assign to this expression")]
    InvalidTarget,
    /// READ stores into integer targets only.
    #[error("READ requires an integer target")]
    ReadTarget,
    /// FOR loops run over integer variables.
    #[error("FOR requires an integer loop variable")]
    LoopVariable,
    /// A character outside the 8-bit code page reached a string value.
    #[error("character {0:?} is outside the code page")]
    UnencodableChar(char),

    /* range errors */
    /// A string operation overflowed the 255-byte capacity.
    #[error("string exceeds 255 bytes")]
    StringTooLong,
    /// CHR$ arguments are single code points.
    #[error("code point {0} out of range")]
    CodePointRange(i16),
    /// SUB$ bounds fell outside the source string.
    #[error("substring bounds out of range")]
    SubstringBounds,
    /// SQR of a negative value.
    #[error("square root of negative value {0}")]
    NegativeSqrt(i16),
    /// OPEN/LOAD/SAVE accept uarts 1 and 2.
    #[error("uart {0} out of range")]
    UartRange(i16),
    /// OPEN accepts bit rates 1 through 15.
    #[error("bit rate {0} out of range")]
    BitRateRange(i16),
    /// FOR requires the initial value strictly below the limit.
    #[error("FOR requires initial below limit, found {initial} and {limit}")]
    ForBounds { initial: i16, limit: i16 },
    /// LOAD modes are 0 (text) and 1 (binary).
    #[error("transfer mode {0} out of range")]
    TransferMode(i16),
    /// Binary transfers are reserved.
    #[error("binary transfers are not supported")]
    BinaryTransfer,

    /* arithmetic */
    /// Division or MOD by zero.
    #[error("division by zero")]
    DivisionByZero,

    /* lookup errors */
    /// A jump targeted a line that is not stored.
    #[error("line {0} does not exist")]
    UnknownLine(i16),
    /// RETURN with an empty call stack.
    #[error("RETURN without GOSUB")]
    ReturnWithoutGosub,
    /// NEXT with an empty loop stack.
    #[error("NEXT without FOR")]
    NextWithoutFor,
    /// READ advanced past the last DATA value.
    #[error("out of DATA")]
    OutOfData,

    /* invalid invocations */
    /// A built-in called with the wrong number of arguments.
    #[error("wrong number of arguments for {0}")]
    BuiltInArity(&'static str),
    /// INPUT into an integer target did not read a decimal integer.
    #[error("invalid integer input {0:?}")]
    InvalidInput(String),

    /* mode errors */
    /// The command only works inside a running program.
    #[error("{0} is only available while a program is running")]
    RequiresRunning(&'static str),
    /// The command only works at the REPL.
    #[error("{0} is only available in immediate mode")]
    RequiresRepl(&'static str),

    /* forwarded */
    /// LOAD pulled an unparsable line over the uart.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// Failure reported by the I/O backend.
    #[error(transparent)]
    Io(#[from] IoError),
    /// Cooperative cancellation; recoverable at the command boundary.
    #[error("execution cancelled")]
    Cancelled,
}

impl RuntimeError {
    /// Return `true` if the error is the cooperative cancel signal rather
    /// than a failure.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Top-level error: everything a REPL round can produce.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// The line never became a command.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// The command failed while executing.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
