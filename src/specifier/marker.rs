//! Environment markers (`; python_version >= "3.8"`).
//!
//! Markers are validated and rendered canonically. They are never
//! evaluated: the tool has no model of the target environment.

use std::fmt;

use super::constraint::Operator;
use super::ParseError;

pub const VARIABLES: [&str; 12] = [
    "python_version",
    "python_full_version",
    "os_name",
    "sys_platform",
    "platform_release",
    "platform_system",
    "platform_version",
    "platform_machine",
    "platform_python_implementation",
    "implementation_name",
    "implementation_version",
    "extra",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    Variable(String),
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOp {
    Compare(Operator),
    In,
    NotIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Compare {
        lhs: MarkerValue,
        op: MarkerOp,
        rhs: MarkerValue,
    },
    And(Box<Marker>, Box<Marker>),
    Or(Box<Marker>, Box<Marker>),
}

impl Marker {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ParseError::at(1, "empty environment marker"));
        }
        let mut parser = Parser { tokens, pos: 0 };
        let marker = parser.or_expr()?;
        if let Some(tok) = parser.peek() {
            return Err(ParseError::at(
                tok.column,
                format!("unexpected `{}` in marker", tok.kind),
            ));
        }
        Ok(marker)
    }
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerValue::Variable(name) => f.write_str(name),
            MarkerValue::Literal(s) if s.contains('"') => write!(f, "'{s}'"),
            MarkerValue::Literal(s) => write!(f, "\"{s}\""),
        }
    }
}

impl fmt::Display for MarkerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerOp::Compare(op) => write!(f, "{op}"),
            MarkerOp::In => f.write_str("in"),
            MarkerOp::NotIn => f.write_str("not in"),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Compare { lhs, op, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Marker::Or(a, b) => write!(f, "{a} or {b}"),
            Marker::And(a, b) => {
                for (i, side) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    match side.as_ref() {
                        Marker::Or(..) => write!(f, "({side})")?,
                        _ => write!(f, "{side}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Op(Operator),
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(s) => f.write_str(s),
            TokenKind::Str(s) => write!(f, "\"{s}\""),
            TokenKind::Op(op) => write!(f, "{op}"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    column: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        let column = i + 1;
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::LParen, column });
            }
            ')' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::RParen, column });
            }
            '\'' | '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == c {
                        closed = true;
                        break;
                    }
                    value.push(ch);
                }
                if !closed {
                    return Err(ParseError::at(column, "unterminated string in marker"));
                }
                tokens.push(Token { kind: TokenKind::Str(value), column });
            }
            '<' | '>' | '=' | '!' | '~' => match Operator::strip_prefix(&input[i..]) {
                Some((op, _)) => {
                    for _ in 0..op.as_str().len() {
                        chars.next();
                    }
                    tokens.push(Token { kind: TokenKind::Op(op), column });
                }
                None => return Err(ParseError::at(column, format!("invalid operator `{c}`"))),
            },
            c if c.is_ascii_alphanumeric() || c == '_' || c == '.' => {
                let mut ident = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token { kind: TokenKind::Ident(ident), column });
            }
            other => {
                return Err(ParseError::at(column, format!("unexpected `{other}` in marker")));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn end_column(&self) -> usize {
        self.tokens.last().map_or(1, |t| t.column + t.kind.to_string().len())
    }

    fn peek_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Ident(s), .. }) if s == word)
    }

    fn or_expr(&mut self) -> Result<Marker, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.peek_keyword("or") {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = Marker::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Marker, ParseError> {
        let mut lhs = self.atom()?;
        while self.peek_keyword("and") {
            self.pos += 1;
            let rhs = self.atom()?;
            lhs = Marker::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn atom(&mut self) -> Result<Marker, ParseError> {
        if matches!(self.peek(), Some(Token { kind: TokenKind::LParen, .. })) {
            let open = self.next().map_or(1, |t| t.column);
            let inner = self.or_expr()?;
            return match self.next() {
                Some(Token { kind: TokenKind::RParen, .. }) => Ok(inner),
                _ => Err(ParseError::at(open, "unclosed `(` in marker")),
            };
        }
        let lhs = self.value()?;
        let op = self.op()?;
        let rhs = self.value()?;
        if matches!((&lhs, &rhs), (MarkerValue::Literal(_), MarkerValue::Literal(_))) {
            return Err(ParseError::at(
                self.end_column(),
                "marker compares two literals; one side must be an environment variable",
            ));
        }
        Ok(Marker::Compare { lhs, op, rhs })
    }

    fn value(&mut self) -> Result<MarkerValue, ParseError> {
        match self.next() {
            Some(Token { kind: TokenKind::Str(s), .. }) => Ok(MarkerValue::Literal(s)),
            Some(Token { kind: TokenKind::Ident(name), column }) => {
                if VARIABLES.contains(&name.as_str()) {
                    Ok(MarkerValue::Variable(name))
                } else {
                    Err(ParseError::at(
                        column,
                        format!("unknown marker variable `{name}`"),
                    ))
                }
            }
            Some(tok) => Err(ParseError::at(
                tok.column,
                format!("expected marker variable or string, found `{}`", tok.kind),
            )),
            None => Err(ParseError::at(
                self.end_column(),
                "expected marker variable or string",
            )),
        }
    }

    fn op(&mut self) -> Result<MarkerOp, ParseError> {
        match self.next() {
            Some(Token { kind: TokenKind::Op(op), .. }) => Ok(MarkerOp::Compare(op)),
            Some(Token { kind: TokenKind::Ident(word), .. }) if word == "in" => Ok(MarkerOp::In),
            Some(Token { kind: TokenKind::Ident(word), column }) if word == "not" => {
                match self.next() {
                    Some(Token { kind: TokenKind::Ident(next), .. }) if next == "in" => {
                        Ok(MarkerOp::NotIn)
                    }
                    _ => Err(ParseError::at(column, "expected `in` after `not`")),
                }
            }
            Some(tok) => Err(ParseError::at(
                tok.column,
                format!("expected marker operator, found `{}`", tok.kind),
            )),
            None => Err(ParseError::at(self.end_column(), "expected marker operator")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_comparison() {
        let m = Marker::parse("python_version>='3.8'").unwrap();
        assert_eq!(m.to_string(), "python_version >= \"3.8\"");
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let m = Marker::parse("os_name == 'nt' or sys_platform == 'darwin' and python_version < '3.9'")
            .unwrap();
        match m {
            Marker::Or(_, rhs) => assert!(matches!(*rhs, Marker::And(..))),
            other => panic!("expected Or at the root, got {other:?}"),
        }
    }

    #[test]
    fn parentheses_survive_rendering() {
        let m = Marker::parse("(os_name=='nt' or os_name=='posix') and extra=='test'").unwrap();
        assert_eq!(
            m.to_string(),
            "(os_name == \"nt\" or os_name == \"posix\") and extra == \"test\""
        );
    }

    #[test]
    fn supports_in_and_not_in() {
        let m = Marker::parse("'linux' in sys_platform and platform_machine not in 'arm64 aarch64'")
            .unwrap();
        assert!(m.to_string().contains("not in"));
    }

    #[test]
    fn rejects_unknown_variable() {
        let err = Marker::parse("python_versoin >= '3'").unwrap_err();
        assert!(err.message.contains("unknown marker variable `python_versoin`"));
        assert_eq!(err.column, 1);
    }

    #[test]
    fn rejects_malformed_markers() {
        assert!(Marker::parse("").is_err());
        assert!(Marker::parse("python_version").is_err());
        assert!(Marker::parse("python_version >= '3").is_err());
        assert!(Marker::parse("(os_name == 'nt'").is_err());
        assert!(Marker::parse("'a' == 'b'").is_err());
        assert!(Marker::parse("os_name == 'nt' os_name").is_err());
        assert!(Marker::parse("os_name not 'nt'").is_err());
    }
}
