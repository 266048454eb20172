//! Line-oriented manifest parser.
//!
//! Never fails: a line that does not parse becomes `LineKind::Malformed`
//! so that every problem in a file is reported in one pass.

use log::debug;

use crate::specifier::parse_requirement;

use super::directive::parse_directive;
use super::model::{Entry, Line, LineKind, Manifest};

pub fn parse_manifest(source: &str, text: &str) -> Manifest {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines = logical_lines(text)
        .into_iter()
        .map(|(number, raw)| {
            let kind = classify(&raw);
            if let LineKind::Malformed(err) = &kind {
                debug!("{source}:{number}: {err}");
            }
            Line { number, raw, kind }
        })
        .collect();
    Manifest::new(source, lines)
}

/// Join `\`-continued physical lines. Comment-only lines never continue.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut physical = text.lines().enumerate();

    while let Some((idx, line)) = physical.next() {
        let mut joined = line.to_string();
        while !joined.trim_start().starts_with('#') && joined.trim_end().ends_with('\\') {
            let keep = joined.trim_end().len() - 1;
            joined.truncate(keep);
            match physical.next() {
                Some((_, next)) => joined.push_str(next),
                None => break,
            }
        }
        out.push((idx + 1, joined));
    }
    out
}

/// Split off a trailing comment. `#` only starts a comment at the start of
/// the line or after whitespace, so URL fragments survive.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let mut prev_ws = true;
    for (i, c) in line.char_indices() {
        if c == '#' && prev_ws {
            return (&line[..i], Some(&line[i + 1..]));
        }
        prev_ws = c.is_whitespace();
    }
    (line, None)
}

fn classify(raw: &str) -> LineKind {
    let (content, comment) = split_comment(raw);
    let content = content.trim();
    let annotation = comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    if content.is_empty() {
        return match comment {
            Some(text) => LineKind::Comment(text.trim().to_string()),
            None => LineKind::Blank,
        };
    }

    if content.starts_with('-') {
        return LineKind::Directive(parse_directive(content, annotation));
    }

    match parse_requirement(content) {
        Ok(requirement) => LineKind::Requirement(Entry {
            requirement,
            annotation,
        }),
        Err(err) => LineKind::Malformed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENSTACK_STYLE: &str = "\
# The order of packages is significant, because pip processes them in the order
# of appearance. Changing the order has an impact on the overall integration
# process, which may cause wedges in the gate later.

hacking>=3.0.1,<3.1.0 # Apache-2.0

coverage!=4.4,>=4.0 # Apache-2.0
fixtures>=3.0.0 # Apache-2.0/BSD
oslotest>=3.2.0 # Apache-2.0
requests-mock>=1.2.0 # Apache-2.0
stestr>=1.0.0 # Apache-2.0
testtools>=2.2.0 # MIT
osc-lib>=2.0.0 # Apache-2.0
";

    #[test]
    fn parses_openstack_style_manifest() {
        let m = parse_manifest("test-requirements.txt", OPENSTACK_STYLE);
        assert_eq!(m.entry_count(), 8);
        assert_eq!(m.malformed().count(), 0);
        let (line, first) = m.entries().next().unwrap();
        assert_eq!(line, 5);
        assert_eq!(first.name(), "hacking");
        assert_eq!(first.annotation.as_deref(), Some("Apache-2.0"));
        assert!(matches!(m.lines[0].kind, LineKind::Comment(_)));
        assert!(matches!(m.lines[3].kind, LineKind::Blank));
    }

    #[test]
    fn keeps_file_order() {
        let m = parse_manifest("m", "zzz\naaa\nmmm\n");
        let names: Vec<&str> = m.entries().map(|(_, e)| e.name()).collect();
        assert_eq!(names, vec!["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn continuation_lines_are_joined() {
        let m = parse_manifest("m", "foo>=1.0,\\\n    <2.0 # MIT\nbar\n");
        let (line, entry) = m.entries().next().unwrap();
        assert_eq!(line, 1);
        assert_eq!(entry.canonical(), "foo>=1.0,<2.0");
        assert_eq!(entry.annotation.as_deref(), Some("MIT"));
        let (line, _) = m.entries().nth(1).unwrap();
        assert_eq!(line, 3);
    }

    #[test]
    fn trailing_backslash_at_eof() {
        let m = parse_manifest("m", "foo\\");
        assert_eq!(m.entries().next().unwrap().1.name(), "foo");
    }

    #[test]
    fn comment_lines_do_not_continue() {
        let m = parse_manifest("m", "# note \\\nfoo\n");
        assert_eq!(m.entry_count(), 1);
        assert!(matches!(m.lines[0].kind, LineKind::Comment(_)));
    }

    #[test]
    fn hash_inside_url_is_not_a_comment() {
        let m = parse_manifest("m", "pip @ https://host/pip.zip#sha1=abc # MIT\n");
        let (_, entry) = m.entries().next().unwrap();
        assert_eq!(entry.requirement.url.as_deref(), Some("https://host/pip.zip#sha1=abc"));
        assert_eq!(entry.annotation.as_deref(), Some("MIT"));
    }

    #[test]
    fn directives_are_classified() {
        let m = parse_manifest("m", "-r requirements.txt\n--index-url=https://x/simple\n");
        let flags: Vec<&str> = m.directives().map(|(_, d)| d.flag.as_str()).collect();
        assert_eq!(flags, vec!["-r", "--index-url"]);
    }

    #[test]
    fn malformed_lines_are_kept() {
        let m = parse_manifest("m", "good>=1\nbad>=\n");
        let (line, err) = m.malformed().next().unwrap();
        assert_eq!(line.number, 2);
        assert_eq!(line.raw, "bad>=");
        assert!(err.message.contains("expected version"));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let m = parse_manifest("m", "\u{feff}mock\n");
        assert_eq!(m.entries().next().unwrap().1.name(), "mock");
    }

    #[test]
    fn empty_comment_marker_has_no_annotation() {
        let m = parse_manifest("m", "mock #\n");
        assert!(m.entries().next().unwrap().1.annotation.is_none());
    }

    #[test]
    fn crlf_line_endings() {
        let m = parse_manifest("m", "mock>=2.0 # BSD\r\nsix\r\n");
        assert_eq!(m.entry_count(), 2);
        assert_eq!(m.entries().next().unwrap().1.annotation.as_deref(), Some("BSD"));
    }
}
