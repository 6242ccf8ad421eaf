//! Host, host group and script path names.

use super::macros::parse_any_lld_macro;

/// Outcome of parsing a name that may embed LLD macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName {
    /// Number of LLD macros and macro functions found
    pub macros: usize,
}

/// Host group name: `/`-separated segments, none of them empty.
///
/// With `lld_macros` set, LLD macros and macro functions are opaque tokens,
/// so a slash inside a macro function parameter does not split the name.
pub fn parse_host_group_name(name: &str, lld_macros: bool) -> Option<ParsedName> {
    if name.is_empty() {
        return None;
    }

    let mut macros = 0;
    let mut segment_empty = true;
    let mut pos = 0;

    while pos < name.len() {
        let rest = &name[pos..];

        if lld_macros && rest.starts_with('{') {
            if let Some(len) = parse_any_lld_macro(rest) {
                macros += 1;
                segment_empty = false;
                pos += len;
                continue;
            }
        }

        let c = rest.chars().next()?;
        if c == '/' {
            if segment_empty {
                return None;
            }
            segment_empty = true;
        } else {
            segment_empty = false;
        }
        pos += c.len_utf8();
    }

    (!segment_empty).then_some(ParsedName { macros })
}

fn is_host_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ' ' | '-')
}

/// Technical host name: letters, digits, space, `_`, `.` and `-`, plus LLD
/// macros when `lld_macros` is set.
pub fn parse_host_name(name: &str, lld_macros: bool) -> Option<ParsedName> {
    if name.is_empty() {
        return None;
    }

    let mut macros = 0;
    let mut pos = 0;

    while pos < name.len() {
        let rest = &name[pos..];

        if lld_macros && rest.starts_with('{') {
            let len = parse_any_lld_macro(rest)?;
            macros += 1;
            pos += len;
            continue;
        }

        let c = rest.chars().next()?;
        if !is_host_name_char(c) {
            return None;
        }
        pos += c.len_utf8();
    }

    Some(ParsedName { macros })
}

/// Split a script path on unescaped `/`. `\/` and `\\` stand for a literal
/// slash and backslash.
pub fn split_script_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('/' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '/' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
}

/// Whether every segment of a script path is non-blank.
pub fn is_valid_script_path(path: &str) -> bool {
    split_script_path(path)
        .iter()
        .all(|segment| !segment.trim().is_empty())
}
