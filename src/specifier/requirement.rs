use std::fmt;

use super::constraint::{Operator, Specifier};
use super::marker::Marker;
use super::ParseError;

/// A parsed requirement specifier: `name[extras] constraints ; marker`
/// or `name[extras] @ url ; marker`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub specifiers: Vec<Specifier>,
    pub url: Option<String>,
    pub marker: Option<Marker>,
}

impl Requirement {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Canonical one-line rendering: normalized names, sorted extras,
    /// normalized versions, specifiers in written order.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized_name())?;
        if !self.extras.is_empty() {
            let mut extras: Vec<String> = self.extras.iter().map(|e| normalize_name(e)).collect();
            extras.sort();
            extras.dedup();
            write!(f, "[{}]", extras.join(","))?;
        }
        match &self.url {
            Some(url) => {
                write!(f, " @ {url}")?;
                if let Some(marker) = &self.marker {
                    write!(f, " ; {marker}")?;
                }
            }
            None => {
                let specs: Vec<String> = self.specifiers.iter().map(ToString::to_string).collect();
                write!(f, "{}", specs.join(","))?;
                if let Some(marker) = &self.marker {
                    write!(f, "; {marker}")?;
                }
            }
        }
        Ok(())
    }
}

/// Lowercase and collapse runs of `-`, `_`, `.` into a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_sep {
                out.push('-');
            }
            in_sep = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_sep = false;
        }
    }
    out
}

/// Parse one requirement (comment already removed).
pub fn parse_requirement(input: &str) -> Result<Requirement, ParseError> {
    let mut cur = Cursor { s: input, pos: 0 };

    cur.skip_ws();
    let name = cur.identifier("package name")?;

    cur.skip_ws();
    let mut extras = Vec::new();
    if cur.eat('[') {
        extras = cur.extras()?;
    }

    cur.skip_ws();
    let mut url = None;
    let mut specifiers = Vec::new();
    if cur.eat('@') {
        cur.skip_ws();
        url = Some(cur.url()?);
    } else if cur.peek() == Some('(') {
        let open = cur.pos + 1;
        cur.pos += 1;
        specifiers = cur.specifiers()?;
        cur.skip_ws();
        if !cur.eat(')') {
            return Err(ParseError::at(open, "unclosed `(` around version constraints"));
        }
    } else if cur.peek().is_some_and(is_operator_start) {
        specifiers = cur.specifiers()?;
    }

    cur.skip_ws();
    let mut marker = None;
    if cur.eat(';') {
        let offset = cur.pos;
        let text = cur.take_rest();
        marker = Some(Marker::parse(text).map_err(|e| e.shifted(offset))?);
    }

    cur.skip_ws();
    if let Some(c) = cur.peek() {
        return Err(ParseError::at(
            cur.pos + 1,
            format!("unexpected `{c}` after requirement `{name}`"),
        ));
    }

    Ok(Requirement {
        name,
        extras,
        specifiers,
        url,
        marker,
    })
}

fn is_operator_start(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!' | '~')
}

struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn take_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.s.len();
        rest
    }

    fn identifier(&mut self, what: &str) -> Result<String, ParseError> {
        let start = self.pos;
        let ident = self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if ident.is_empty() {
            let found = self.peek().map_or("end of line".to_string(), |c| format!("`{c}`"));
            return Err(ParseError::at(start + 1, format!("expected {what}, found {found}")));
        }
        let bad_edge = |c: Option<char>| !c.is_some_and(|c| c.is_ascii_alphanumeric());
        if bad_edge(ident.chars().next()) || bad_edge(ident.chars().last()) {
            return Err(ParseError::at(
                start + 1,
                format!("{what} `{ident}` must start and end with a letter or digit"),
            ));
        }
        Ok(ident.to_string())
    }

    fn extras(&mut self) -> Result<Vec<String>, ParseError> {
        let mut extras = Vec::new();
        self.skip_ws();
        if self.eat(']') {
            return Ok(extras);
        }
        loop {
            self.skip_ws();
            extras.push(self.identifier("extra name")?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(extras);
            }
            return Err(ParseError::at(self.pos + 1, "expected `,` or `]` in extras"));
        }
    }

    fn url(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let url = self.take_while(|c| !c.is_whitespace());
        let has_scheme = url
            .split_once(':')
            .is_some_and(|(scheme, _)| {
                !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            });
        if !has_scheme {
            return Err(ParseError::at(
                start + 1,
                format!("expected URL with a scheme after `@`, found `{url}`"),
            ));
        }
        Ok(url.to_string())
    }

    fn specifiers(&mut self) -> Result<Vec<Specifier>, ParseError> {
        let mut specs = Vec::new();
        loop {
            self.skip_ws();
            let op_start = self.pos;
            let Some((op, _)) = Operator::strip_prefix(self.rest()) else {
                return Err(ParseError::at(
                    op_start + 1,
                    format!("expected version operator, found `{}`", self.rest()),
                ));
            };
            self.pos += op.as_str().len();
            self.skip_ws();
            let token_start = self.pos;
            let token = self.take_while(|c| !c.is_whitespace() && !matches!(c, ',' | ';' | ')'));
            if token.is_empty() {
                return Err(ParseError::at(
                    token_start + 1,
                    format!("expected version after `{op}`"),
                ));
            }
            specs.push(Specifier::parse(op, token).map_err(|e| e.shifted(token_start))?);

            self.skip_ws();
            if !self.eat(',') {
                return Ok(specs);
            }
        }
    }
}
