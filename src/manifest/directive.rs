//! Installer option lines recognised inside a manifest.

use super::model::Directive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub short: Option<&'static str>,
    pub long: &'static str,
    pub takes_value: bool,
}

pub const KNOWN_DIRECTIVES: &[DirectiveSpec] = &[
    DirectiveSpec { short: Some("-r"), long: "--requirement", takes_value: true },
    DirectiveSpec { short: Some("-c"), long: "--constraint", takes_value: true },
    DirectiveSpec { short: Some("-e"), long: "--editable", takes_value: true },
    DirectiveSpec { short: Some("-i"), long: "--index-url", takes_value: true },
    DirectiveSpec { short: None, long: "--extra-index-url", takes_value: true },
    DirectiveSpec { short: None, long: "--no-index", takes_value: false },
    DirectiveSpec { short: Some("-f"), long: "--find-links", takes_value: true },
    DirectiveSpec { short: None, long: "--pre", takes_value: false },
    DirectiveSpec { short: None, long: "--prefer-binary", takes_value: false },
    DirectiveSpec { short: None, long: "--require-hashes", takes_value: false },
    DirectiveSpec { short: None, long: "--only-binary", takes_value: true },
    DirectiveSpec { short: None, long: "--no-binary", takes_value: true },
    DirectiveSpec { short: None, long: "--trusted-host", takes_value: true },
    DirectiveSpec { short: None, long: "--use-feature", takes_value: true },
];

/// Look up a flag by its short or long spelling.
pub fn lookup(flag: &str) -> Option<&'static DirectiveSpec> {
    KNOWN_DIRECTIVES
        .iter()
        .find(|spec| spec.long == flag || spec.short == Some(flag))
}

/// Split `--flag=value`, `--flag value`, `-xvalue`, or `-x value`.
pub fn parse_directive(content: &str, annotation: Option<String>) -> Directive {
    let (flag, value) = if content.starts_with("--") {
        let end = content
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(content.len());
        let rest = content[end..].trim_start();
        let rest = rest.strip_prefix('=').unwrap_or(rest);
        (&content[..end], rest.trim())
    } else {
        let end = content
            .char_indices()
            .nth(2)
            .map_or(content.len(), |(i, _)| i);
        (&content[..end], content[end..].trim())
    };

    Directive {
        flag: flag.to_string(),
        value: (!value.is_empty()).then(|| value.to_string()),
        annotation,
    }
}
