//! Abstract syntax for parsed source lines.

use std::cmp::Ordering;
use std::fmt;

use crate::value::CodyString;

/// One of the 26 letter-named variable slots, `A` through `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarName(u8);

impl VarName {
    /// Build a name from an uppercase letter.
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_uppercase().then(|| Self(letter as u8 - b'A'))
    }

    /// Slot index, `0..26`.
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// The letter this name was written as.
    pub const fn letter(&self) -> char {
        (self.0 + b'A') as char
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Relational operators; their results feed IF conditions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl RelationOp {
    /// Apply the operator to an already-computed operand ordering.
    pub const fn test(&self, ord: Ordering) -> bool {
        match self {
            Self::Equal => matches!(ord, Ordering::Equal),
            Self::NotEqual => !matches!(ord, Ordering::Equal),
            Self::Less => matches!(ord, Ordering::Less),
            Self::LessEqual => !matches!(ord, Ordering::Greater),
            Self::Greater => matches!(ord, Ordering::Greater),
            Self::GreaterEqual => !matches!(ord, Ordering::Less),
        }
    }
}

/// Built-in variables: names read without call parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInVar {
    /// The jiffy timer.
    Ti,
}

impl BuiltInVar {
    /// Source spelling.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ti => "TI",
        }
    }

    /// Resolve a source spelling against the closed list.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "TI" => Some(Self::Ti),
            _ => None,
        }
    }
}

/// Built-in functions; parentheses are required even for empty argument
/// lists. Arity is checked at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltIn {
    Abs,
    Asc,
    And,
    At,
    Chr,
    Len,
    Mod,
    Not,
    Or,
    Peek,
    Rnd,
    Sqr,
    Str,
    Sub,
    Tab,
    Val,
    Xor,
}

impl BuiltIn {
    /// Source spelling.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Abs => "ABS",
            Self::Asc => "ASC",
            Self::And => "AND",
            Self::At => "AT",
            Self::Chr => "CHR$",
            Self::Len => "LEN",
            Self::Mod => "MOD",
            Self::Not => "NOT",
            Self::Or => "OR",
            Self::Peek => "PEEK",
            Self::Rnd => "RND",
            Self::Sqr => "SQR",
            Self::Str => "STR$",
            Self::Sub => "SUB$",
            Self::Tab => "TAB",
            Self::Val => "VAL",
            Self::Xor => "XOR",
        }
    }

    /// Resolve a source spelling against the closed list.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "ABS" => Some(Self::Abs),
            "ASC" => Some(Self::Asc),
            "AND" => Some(Self::And),
            "AT" => Some(Self::At),
            "CHR$" => Some(Self::Chr),
            "LEN" => Some(Self::Len),
            "MOD" => Some(Self::Mod),
            "NOT" => Some(Self::Not),
            "OR" => Some(Self::Or),
            "PEEK" => Some(Self::Peek),
            "RND" => Some(Self::Rnd),
            "SQR" => Some(Self::Sqr),
            "STR$" => Some(Self::Str),
            "SUB$" => Some(Self::Sub),
            "TAB" => Some(Self::Tab),
            "VAL" => Some(Self::Val),
            "XOR" => Some(Self::Xor),
            _ => None,
        }
    }
}

/// Expression AST node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntegerLiteral(i16),
    StringLiteral(CodyString),
    /// A bare integer variable; equivalent to subscript 0.
    IntegerVariable(VarName),
    /// A bare string variable. String variables have no subscripts.
    StringVariable(VarName),
    /// A subscripted integer variable.
    Array { var: VarName, index: Box<Expr> },
    BuiltInVariable(BuiltInVar),
    BuiltInCall { function: BuiltIn, args: Vec<Expr> },
    UnaryMinus(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Relation {
        op: RelationOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Return `true` if the node may appear on the left of an assignment
    /// or as an INPUT/READ target.
    pub const fn is_lvalue(&self) -> bool {
        matches!(
            self,
            Self::IntegerVariable(_) | Self::StringVariable(_) | Self::Array { .. }
        )
    }
}

/// Command variants, each with its own payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Rem,
    Empty,
    Assignment { target: Expr, value: Expr },
    Print { values: Vec<Expr>, no_newline: bool },
    Input { targets: Vec<Expr> },
    If { condition: Expr, then: Box<Command> },
    Goto(Expr),
    Gosub(Expr),
    Return,
    End,
    For {
        variable: Expr,
        initial: Expr,
        limit: Expr,
    },
    Next,
    Data(Vec<Expr>),
    Read { targets: Vec<Expr> },
    Restore,
    Poke { address: Expr, value: Expr },
    Sys(Expr),
    Open { uart: Expr, bit_rate: Expr },
    Close,
    Load { uart: Expr, mode: Expr },
    Save { uart: Expr },
    New,
    Run,
    List {
        start: Option<Expr>,
        end: Option<Expr>,
    },
}

/// A parsed physical line: the command, its optional line number, and the
/// source text it was parsed from (retained for LIST and SAVE).
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: Option<u16>,
    pub source: String,
    pub command: Command,
}
