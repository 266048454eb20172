//! Release version tokens and their total ordering.
//!
//! Accepts the public version scheme used by Python package indexes
//! (`[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`) including the common
//! alternate spellings, and normalizes it for display.

use std::cmp::Ordering;
use std::fmt;

use super::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreKind {
    Alpha,
    Beta,
    Rc,
}

impl PreKind {
    fn as_str(self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Rc => "rc",
        }
    }
}

/// One dot-separated label of a local version (`+ubuntu.1`).
///
/// Declaration order matters: text labels sort before numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalSegment {
    Text(String),
    Num(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Text(s) => write!(f, "{s}"),
            LocalSegment::Num(n) => write!(f, "{n}"),
        }
    }
}

/// A parsed version. Equality and ordering ignore trailing zero release
/// segments, so `1.0` == `1.0.0`.
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreKind, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Vec<LocalSegment>,
}

impl Version {
    /// Build a plain release version (`1.2.3`).
    pub fn from_release(release: Vec<u64>) -> Self {
        Self {
            epoch: 0,
            release,
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let lowered = input.trim().to_ascii_lowercase();
        let mut cur = Cursor::new(&lowered);
        cur.eat("v");

        let mut epoch = 0;
        let save = cur.pos;
        match cur.digits()? {
            Some(n) if cur.eat("!") => epoch = n,
            _ => cur.pos = save,
        }

        let mut release = Vec::new();
        match cur.digits()? {
            Some(n) => release.push(n),
            None => return Err(ParseError::at(cur.pos + 1, "expected release number")),
        }
        loop {
            let save = cur.pos;
            if !cur.eat(".") {
                break;
            }
            match cur.digits()? {
                Some(n) => release.push(n),
                None => {
                    cur.pos = save;
                    break;
                }
            }
        }

        let pre = cur.pre_release()?;
        let post = cur.post_release()?;
        let dev = cur.dev_release()?;
        let local = cur.local()?;

        if !cur.at_end() {
            return Err(ParseError::at(
                cur.pos + 1,
                format!("unexpected `{}` in version `{}`", cur.rest(), input.trim()),
            ));
        }

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    pub fn has_local(&self) -> bool {
        !self.local.is_empty()
    }

    /// Same version with any local label dropped.
    pub fn public(&self) -> Version {
        Version {
            local: Vec::new(),
            ..self.clone()
        }
    }

    /// Only epoch and release segments are set.
    pub fn is_plain_release(&self) -> bool {
        self.pre.is_none() && self.post.is_none() && self.dev.is_none() && self.local.is_empty()
    }

    /// `release` with its last segment incremented: `[1, 4]` -> `[1, 5]`.
    /// Callers pass the prefix to bump, e.g. `[1]` for `~=1.4`.
    pub fn bump_prefix(release: &[u64]) -> Vec<u64> {
        let mut bumped = release.to_vec();
        if let Some(last) = bumped.last_mut() {
            *last = last.saturating_add(1);
        }
        bumped
    }

    /// Lowest version that still carries the given release prefix
    /// (`X.Y.dev0`).
    pub fn floor_of(epoch: u64, release: Vec<u64>) -> Version {
        Version {
            epoch,
            dev: Some(0),
            ..Version::from_release(release)
        }
    }

    fn trimmed_release(&self) -> &[u64] {
        let end = self
            .release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |i| i + 1);
        &self.release[..end]
    }

    // Sort key for the pre-release slot: a bare dev release sorts before
    // every pre-release, a final release after all of them.
    fn pre_key(&self) -> (u8, Option<PreKind>, u64) {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => (0, None, 0),
            (None, _, _) => (2, None, 0),
            (Some((kind, n)), _, _) => (1, Some(kind), n),
        }
    }

    fn post_key(&self) -> (u8, u64) {
        self.post.map_or((0, 0), |n| (1, n))
    }

    fn dev_key(&self) -> (u8, u64) {
        self.dev.map_or((1, 0), |n| (0, n))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.trimmed_release().cmp(other.trimmed_release()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post_key().cmp(&other.post_key()))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((kind, n)) = self.pre {
            write!(f, "{}{n}", kind.as_str())?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if !self.local.is_empty() {
            let local: Vec<String> = self.local.iter().map(ToString::to_string).collect();
            write!(f, "+{}", local.join("."))?;
        }
        Ok(())
    }
}

struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.s.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn eat_sep(&mut self) -> bool {
        self.eat(".") || self.eat("-") || self.eat("_")
    }

    /// Longest matching word wins, so `preview` beats `pre`.
    fn eat_word(&mut self, words: &[&str]) -> Option<usize> {
        let rest = self.rest();
        let (idx, word) = words
            .iter()
            .enumerate()
            .filter(|(_, w)| rest.starts_with(**w))
            .max_by_key(|(_, w)| w.len())?;
        self.pos += word.len();
        Some(idx)
    }

    fn digits(&mut self) -> Result<Option<u64>, ParseError> {
        let rest = self.rest();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return Ok(None);
        }
        let value = rest[..len].parse::<u64>().map_err(|_| {
            ParseError::at(self.pos + 1, format!("version number `{}` is too large", &rest[..len]))
        })?;
        self.pos += len;
        Ok(Some(value))
    }

    fn pre_release(&mut self) -> Result<Option<(PreKind, u64)>, ParseError> {
        const WORDS: [&str; 8] = ["alpha", "a", "beta", "b", "preview", "pre", "rc", "c"];
        let save = self.pos;
        self.eat_sep();
        let kind = match self.eat_word(&WORDS) {
            Some(0 | 1) => PreKind::Alpha,
            Some(2 | 3) => PreKind::Beta,
            Some(_) => PreKind::Rc,
            None => {
                self.pos = save;
                return Ok(None);
            }
        };
        let before_num = self.pos;
        self.eat_sep();
        match self.digits()? {
            Some(n) => Ok(Some((kind, n))),
            None => {
                self.pos = before_num;
                Ok(Some((kind, 0)))
            }
        }
    }

    fn post_release(&mut self) -> Result<Option<u64>, ParseError> {
        let save = self.pos;
        // Implicit post release: `1.0-1`.
        if self.eat("-") {
            if let Some(n) = self.digits()? {
                return Ok(Some(n));
            }
            self.pos = save;
        }
        self.eat_sep();
        if self.eat_word(&["post", "rev", "r"]).is_none() {
            self.pos = save;
            return Ok(None);
        }
        let before_num = self.pos;
        self.eat_sep();
        match self.digits()? {
            Some(n) => Ok(Some(n)),
            None => {
                self.pos = before_num;
                Ok(Some(0))
            }
        }
    }

    fn dev_release(&mut self) -> Result<Option<u64>, ParseError> {
        let save = self.pos;
        self.eat_sep();
        if !self.eat("dev") {
            self.pos = save;
            return Ok(None);
        }
        let before_num = self.pos;
        self.eat_sep();
        match self.digits()? {
            Some(n) => Ok(Some(n)),
            None => {
                self.pos = before_num;
                Ok(Some(0))
            }
        }
    }

    fn local(&mut self) -> Result<Vec<LocalSegment>, ParseError> {
        if !self.eat("+") {
            return Ok(Vec::new());
        }
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
            .count();
        let body = &rest[..len];
        self.pos += len;

        let mut segments = Vec::new();
        for label in body.split(['.', '-', '_']) {
            if label.is_empty() {
                return Err(ParseError::at(start + 1, "empty local version label"));
            }
            segments.push(match label.parse::<u64>() {
                Ok(n) if label.bytes().all(|b| b.is_ascii_digit()) => LocalSegment::Num(n),
                _ => LocalSegment::Text(label.to_string()),
            });
        }
        Ok(segments)
    }
}
