//! Whitespace-insensitive recursive-descent parser for source lines.
//!
//! Each physical line parses to exactly one [`Line`]; any failure rejects
//! the whole line without emitting a partial command.

use crate::ast::*;
use crate::consts::MAX_LINE_NUMBER;
use crate::error::ParseError;
use crate::value::CodyString;

/// Reserved command keywords. No keyword is a prefix of another, but the
/// scan still takes the longest match.
const KEYWORDS: &[&str] = &[
    "REM", "GOSUB", "PRINT", "IF", "END", "INPUT", "GOTO", "NEXT", "FOR", "RETURN", "OPEN",
    "CLOSE", "DATA", "READ", "RESTORE", "POKE", "SYS", "NEW", "LOAD", "SAVE", "RUN", "LIST",
];

const TERM_OPS: &[(&str, BinaryOp)] = &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)];

const FACTOR_OPS: &[(&str, BinaryOp)] = &[("*", BinaryOp::Mul), ("/", BinaryOp::Div)];

/// Relational operators, longest spellings first.
const RELATION_OPS: &[(&str, RelationOp)] = &[
    ("<=", RelationOp::LessEqual),
    (">=", RelationOp::GreaterEqual),
    ("<>", RelationOp::NotEqual),
    ("<", RelationOp::Less),
    (">", RelationOp::Greater),
    ("=", RelationOp::Equal),
];

/// Parse one physical source line, line number included.
pub fn parse_line(source: &str) -> Result<Line, ParseError> {
    let trimmed = source.trim();
    let mut parser = Parser::new(trimmed);

    let number = parser.parse_line_number()?;
    let command = parser.parse_command()?;

    Ok(Line {
        number,
        source: trimmed.to_string(),
        command,
    })
}

/// Parse a newline-separated program listing, skipping blank lines. Every
/// remaining line must carry a line number.
pub fn parse_program(code: &str) -> Result<Vec<Line>, ParseError> {
    let mut lines = Vec::new();

    for source in code.lines() {
        let source = source.trim();

        if source.is_empty() {
            continue;
        }

        let line = parse_line(source)?;

        if line.number.is_none() {
            return Err(ParseError::MissingLineNumber);
        }

        lines.push(line);
    }

    Ok(lines)
}

/// Parse a standalone expression, for direct evaluation.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(source.trim());
    let expr = parser.parse_expr(false)?;
    parser.finish()?;

    Ok(expr)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /* cursor primitives */

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn rest(&self) -> String {
        self.chars[self.pos.min(self.chars.len())..].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    /// Return `true` if the token starts at the cursor, without consuming.
    fn matches(&self, token: &str) -> bool {
        token
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    /// Consume an exact token, then trailing whitespace.
    fn expect(&mut self, token: &'static str) -> Result<(), ParseError> {
        if !self.matches(token) {
            return Err(ParseError::Expected(token));
        }

        self.pos += token.chars().count();
        self.skip_whitespace();
        Ok(())
    }

    /// Consume one character if it is `c`.
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require the end of the line.
    fn finish(&mut self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(ParseError::TrailingInput(self.rest()))
        }
    }

    /// Longest operator spelling matching at the cursor, consumed along
    /// with trailing whitespace.
    fn find_op<T: Copy>(&mut self, ops: &[(&'static str, T)]) -> Option<T> {
        for (token, op) in ops {
            if self.matches(token) {
                self.pos += token.chars().count();
                self.skip_whitespace();
                return Some(*op);
            }
        }

        None
    }

    /* line structure */

    fn parse_line_number(&mut self) -> Result<Option<u16>, ParseError> {
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        let mut value: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value * 10 + d;

            if value > u32::from(MAX_LINE_NUMBER) {
                return Err(ParseError::LineNumberRange(value));
            }

            self.advance();
        }

        self.skip_whitespace();
        Ok(Some(value as u16))
    }

    /// Parse a command without a line-number phase; this is also the
    /// entry for the command after `THEN`.
    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let keyword = KEYWORDS
            .iter()
            .copied()
            .filter(|k| self.matches(k))
            .max_by_key(|k| k.len());

        match keyword {
            Some(keyword) => {
                self.pos += keyword.len();
                self.skip_whitespace();
                self.parse_command_body(keyword)
            }
            None if self.at_end() => Ok(Command::Empty),
            // heuristic: anything else containing `=` is an assignment
            None if self.rest().contains('=') => self.parse_assignment(),
            None => Err(ParseError::UnknownCommand(self.rest())),
        }
    }

    fn parse_command_body(&mut self, keyword: &str) -> Result<Command, ParseError> {
        match keyword {
            "REM" => {
                self.pos = self.chars.len();
                Ok(Command::Rem)
            }
            "NEXT" => self.nullary(Command::Next),
            "RETURN" => self.nullary(Command::Return),
            "END" => self.nullary(Command::End),
            "CLOSE" => self.nullary(Command::Close),
            "RESTORE" => self.nullary(Command::Restore),
            "NEW" => self.nullary(Command::New),
            "RUN" => self.nullary(Command::Run),
            "GOTO" => {
                let target = self.parse_expr(false)?;
                self.finish()?;
                Ok(Command::Goto(target))
            }
            "GOSUB" => {
                let target = self.parse_expr(false)?;
                self.finish()?;
                Ok(Command::Gosub(target))
            }
            "PRINT" => {
                let values = self.parse_list(false)?;
                let no_newline = self.eat(';');
                self.skip_whitespace();
                self.finish()?;

                Ok(Command::Print { values, no_newline })
            }
            "INPUT" => {
                let targets = self.parse_targets()?;
                Ok(Command::Input { targets })
            }
            "READ" => {
                let targets = self.parse_targets()?;
                Ok(Command::Read { targets })
            }
            "DATA" => {
                let values = self.parse_list(false)?;
                self.finish()?;

                if values.is_empty() {
                    return Err(ParseError::ExpectedOperands);
                }

                for value in &values {
                    let literal = match value {
                        Expr::IntegerLiteral(_) => true,
                        Expr::UnaryMinus(inner) => {
                            matches!(inner.as_ref(), Expr::IntegerLiteral(_))
                        }
                        _ => false,
                    };

                    if !literal {
                        return Err(ParseError::InvalidDataValue);
                    }
                }

                Ok(Command::Data(values))
            }
            "IF" => {
                let condition = self.parse_expr(true)?;

                if !matches!(condition, Expr::Relation { .. }) {
                    return Err(ParseError::ExpectedRelation);
                }

                self.expect("THEN")?;

                if self.at_end() {
                    return Err(ParseError::UnexpectedEnd);
                }

                let then = Box::new(self.parse_command()?);

                Ok(Command::If { condition, then })
            }
            "FOR" => {
                let variable = self.parse_expr(false)?;

                if !variable.is_lvalue() {
                    return Err(ParseError::InvalidTarget);
                }

                self.expect("=")?;
                let initial = self.parse_expr(false)?;
                self.expect("TO")?;
                let limit = self.parse_expr(false)?;
                self.finish()?;

                Ok(Command::For {
                    variable,
                    initial,
                    limit,
                })
            }
            "POKE" => {
                let [address, value] = self.parse_pair()?;
                Ok(Command::Poke { address, value })
            }
            "SYS" => {
                let address = self.parse_expr(false)?;
                self.finish()?;
                Ok(Command::Sys(address))
            }
            "OPEN" => {
                let [uart, bit_rate] = self.parse_pair()?;
                Ok(Command::Open { uart, bit_rate })
            }
            "LOAD" => {
                let [uart, mode] = self.parse_pair()?;
                Ok(Command::Load { uart, mode })
            }
            "SAVE" => {
                let uart = self.parse_expr(false)?;
                self.finish()?;
                Ok(Command::Save { uart })
            }
            "LIST" => {
                let mut bounds = self.parse_list(false)?;
                self.finish()?;

                if bounds.len() > 2 {
                    return Err(ParseError::ListBounds);
                }

                let end = if bounds.len() == 2 { bounds.pop() } else { None };
                let start = bounds.pop();

                Ok(Command::List { start, end })
            }
            _ => Err(ParseError::UnknownCommand(keyword.to_string())),
        }
    }

    fn nullary(&mut self, command: Command) -> Result<Command, ParseError> {
        self.finish()?;
        Ok(command)
    }

    fn parse_assignment(&mut self) -> Result<Command, ParseError> {
        let target = self.parse_expr(false)?;

        if !target.is_lvalue() {
            return Err(ParseError::InvalidTarget);
        }

        self.expect("=")?;
        let value = self.parse_expr(false)?;
        self.finish()?;

        Ok(Command::Assignment { target, value })
    }

    /// Nonempty comma-separated lvalue list for INPUT and READ.
    fn parse_targets(&mut self) -> Result<Vec<Expr>, ParseError> {
        let targets = self.parse_list(false)?;
        self.finish()?;

        if targets.is_empty() {
            return Err(ParseError::ExpectedOperands);
        }

        if targets.iter().any(|t| !t.is_lvalue()) {
            return Err(ParseError::InvalidTarget);
        }

        Ok(targets)
    }

    /// Exactly two comma-separated expressions.
    fn parse_pair(&mut self) -> Result<[Expr; 2], ParseError> {
        let mut list = self.parse_list(false)?;
        self.finish()?;

        if list.len() != 2 {
            return Err(ParseError::Expected("two expressions"));
        }

        let second = list.remove(1);
        let first = list.remove(0);

        Ok([first, second])
    }

    /* expressions */

    /// Comma-separated expression list; empty input parses to an empty
    /// list.
    fn parse_list(&mut self, rel_op: bool) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = Vec::new();

        if self.at_end() {
            return Ok(exprs);
        }

        exprs.push(self.parse_expr(rel_op)?);

        while self.eat(',') {
            self.skip_whitespace();
            exprs.push(self.parse_expr(rel_op)?);
        }

        Ok(exprs)
    }

    fn parse_expr(&mut self, rel_op: bool) -> Result<Expr, ParseError> {
        if rel_op {
            self.parse_relation()
        } else {
            self.parse_term()
        }
    }

    fn parse_relation(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.find_op(RELATION_OPS) {
            let right = self.parse_term()?;
            left = Expr::Relation {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.find_op(TERM_OPS) {
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.find_op(FACTOR_OPS) {
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat('-') {
            self.skip_whitespace();
            let expr = self.parse_unary()?;
            return Ok(Expr::UnaryMinus(Box::new(expr)));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some('"') => self.parse_string_literal(),
            Some('(') => {
                self.advance();
                self.skip_whitespace();
                let expr = self.parse_expr(false)?;
                self.expect(")")?;
                Ok(expr)
            }
            Some(c) if c.is_ascii_digit() => self.parse_integer_literal(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_variable_or_builtin(),
            Some(c) => Err(ParseError::UnexpectedChar(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Digit run, wrapped modulo 2^16 like every other integer.
    fn parse_integer_literal(&mut self) -> Result<Expr, ParseError> {
        let mut value: u16 = 0;

        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.wrapping_mul(10).wrapping_add(d as u16);
            self.advance();
        }

        self.skip_whitespace();
        Ok(Expr::IntegerLiteral(value as i16))
    }

    fn parse_string_literal(&mut self) -> Result<Expr, ParseError> {
        if !self.eat('"') {
            return Err(ParseError::Expected("\""));
        }

        let mut bytes = Vec::new();

        loop {
            let c = self.peek().ok_or(ParseError::UnterminatedString)?;
            self.advance();

            if c == '"' {
                break;
            }

            let code = u8::try_from(u32::from(c))
                .map_err(|_| ParseError::InvalidCodePoint(u32::from(c)))?;
            bytes.push(code);
        }

        let literal = CodyString::from_bytes(bytes).map_err(|_| ParseError::StringTooLong)?;
        self.skip_whitespace();

        Ok(Expr::StringLiteral(literal))
    }

    fn parse_variable_or_builtin(&mut self) -> Result<Expr, ParseError> {
        let mut name = String::new();

        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphabetic()) {
            name.push(c);
            self.advance();
        }

        if self.peek() == Some('$') {
            name.push('$');
            self.advance();
        }

        self.skip_whitespace();

        if let Some(var) = BuiltInVar::lookup(&name) {
            return Ok(Expr::BuiltInVariable(var));
        }

        if let Some(function) = BuiltIn::lookup(&name) {
            return self.parse_builtin_call(function);
        }

        let mut letters = name.chars();

        match (letters.next(), letters.next(), letters.next()) {
            (Some(letter), None, None) => {
                let var = VarName::new(letter)
                    .ok_or_else(|| ParseError::UnknownBuiltIn(name.clone()))?;
                self.parse_integer_variable(var)
            }
            (Some(letter), Some('$'), None) => {
                let var = VarName::new(letter)
                    .ok_or_else(|| ParseError::UnknownBuiltIn(name.clone()))?;
                // string variables have no subscripts; a trailing `(`
                // falls out as trailing input upstream
                Ok(Expr::StringVariable(var))
            }
            _ => Err(ParseError::UnknownBuiltIn(name)),
        }
    }

    /// Built-in calls require parentheses, even empty ones.
    fn parse_builtin_call(&mut self, function: BuiltIn) -> Result<Expr, ParseError> {
        if !self.eat('(') {
            return Err(ParseError::Expected("("));
        }

        self.skip_whitespace();

        let args = if self.peek() == Some(')') {
            Vec::new()
        } else {
            self.parse_arguments()?
        };

        self.expect(")")?;

        Ok(Expr::BuiltInCall { function, args })
    }

    /// Argument list; stops at `)` rather than end of line.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expr(false)?];

        while self.eat(',') {
            self.skip_whitespace();
            exprs.push(self.parse_expr(false)?);
        }

        Ok(exprs)
    }

    /// Optional single array subscript after an integer variable.
    fn parse_integer_variable(&mut self, var: VarName) -> Result<Expr, ParseError> {
        if !self.eat('(') {
            return Ok(Expr::IntegerVariable(var));
        }

        self.skip_whitespace();

        let mut indices = if self.peek() == Some(')') {
            Vec::new()
        } else {
            self.parse_arguments()?
        };

        self.expect(")")?;

        if indices.len() != 1 {
            return Err(ParseError::ArrayIndex);
        }

        let index = indices.remove(0);

        Ok(Expr::Array {
            var,
            index: Box::new(index),
        })
    }
}
