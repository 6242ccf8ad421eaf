//! User macros and low-level discovery macros.
//!
//! - user macro: `{$NAME}`, `{$NAME:context}`, `{$NAME:"quoted context"}`,
//!   `{$NAME:regex:"pattern"}`
//! - LLD macro: `{#NAME}`
//! - LLD macro function: `{{#NAME}.func(param, "quoted param")}`
//! - user macro function: `{{$NAME}.func()}`
//!
//! Macro names consist of `A-Z`, `0-9`, `_` and `.`.
//!
//! Every `parse_*` function matches at the start of its input and returns
//! the number of bytes consumed.

/// A user macro recognized at the start of some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMacro {
    pub name: String,
    pub context: Option<MacroContext>,
    /// Bytes consumed
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroContext {
    /// Literal context with quotes and escapes resolved
    Literal(String),
    /// Regular expression context
    Regex(String),
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'.'
}

fn name_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_name_byte(b)).count()
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    pos
}

/// Parse a double-quoted string at `pos`; `\"` is the only escape.
/// Returns the unescaped content and the position after the closing quote.
fn parse_quoted(text: &str, pos: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'"') {
        return None;
    }

    let mut content = String::new();
    let mut chars = text[pos + 1..].char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' if text[pos + 1 + offset + 1..].starts_with('"') => {
                chars.next();
                content.push('"');
            }
            '"' => return Some((content, pos + 1 + offset + 1)),
            _ => content.push(c),
        }
    }

    None
}

/// Parse a user macro at the start of `text`.
pub fn parse_user_macro(text: &str) -> Option<UserMacro> {
    let bytes = text.as_bytes();
    if !text.starts_with("{$") {
        return None;
    }

    let name_end = 2 + name_len(&bytes[2..]);
    if name_end == 2 {
        return None;
    }
    let name = text[2..name_end].to_string();

    match bytes.get(name_end) {
        Some(b'}') => Some(UserMacro {
            name,
            context: None,
            len: name_end + 1,
        }),
        Some(b':') => {
            let (context, end) = parse_context(text, name_end + 1)?;
            Some(UserMacro {
                name,
                context: Some(context),
                len: end,
            })
        }
        _ => None,
    }
}

/// Parse a macro context starting right after the colon; returns the
/// context and the position after the closing brace.
fn parse_context(text: &str, start: usize) -> Option<(MacroContext, usize)> {
    let bytes = text.as_bytes();
    let mut pos = skip_spaces(bytes, start);
    let mut regex = false;

    if text[pos..].starts_with("regex:") {
        regex = true;
        pos = skip_spaces(bytes, pos + "regex:".len());
    }

    let wrap = |value: String| {
        if regex {
            MacroContext::Regex(value)
        } else {
            MacroContext::Literal(value)
        }
    };

    if bytes.get(pos) == Some(&b'"') {
        let (value, after) = parse_quoted(text, pos)?;
        let close = skip_spaces(bytes, after);
        return (bytes.get(close) == Some(&b'}')).then(|| (wrap(value), close + 1));
    }

    let close = pos + text[pos..].find('}')?;
    Some((wrap(text[pos..close].to_string()), close + 1))
}

/// Whether the whole of `text` is one user macro.
pub fn is_user_macro(text: &str) -> bool {
    parse_user_macro(text).is_some_and(|m| m.len == text.len())
}

/// Whether a user macro appears anywhere in `text`.
pub fn contains_user_macro(text: &str) -> bool {
    text.match_indices("{$")
        .any(|(index, _)| parse_user_macro(&text[index..]).is_some())
}

/// Canonical form of a user macro used to compare macros for equality:
/// `{$A: "x"}` and `{$A:x}` both become `A:context:x`.
///
/// Text that is not a user macro is returned unchanged.
pub fn trim_user_macro(text: &str) -> String {
    match parse_user_macro(text) {
        Some(UserMacro {
            name, context: None, ..
        }) => name,
        Some(UserMacro {
            name,
            context: Some(MacroContext::Literal(context)),
            ..
        }) => format!("{name}:context:{context}"),
        Some(UserMacro {
            name,
            context: Some(MacroContext::Regex(regex)),
            ..
        }) => format!("{name}:regex:{regex}"),
        None => text.to_string(),
    }
}

/// Parse an LLD macro at the start of `text`.
pub fn parse_lld_macro(text: &str) -> Option<usize> {
    if !text.starts_with("{#") {
        return None;
    }

    let bytes = text.as_bytes();
    let name_end = 2 + name_len(&bytes[2..]);
    (name_end > 2 && bytes.get(name_end) == Some(&b'}')).then_some(name_end + 1)
}

/// Parse an LLD macro function at the start of `text`.
pub fn parse_lld_macro_function(text: &str) -> Option<usize> {
    parse_macro_function(text, parse_lld_macro)
}

/// Parse a user macro function such as `{{$PORT: ssh}.func()}` at the
/// start of `text`.
pub fn parse_user_macro_function(text: &str) -> Option<usize> {
    parse_macro_function(text, |inner| parse_user_macro(inner).map(|m| m.len))
}

/// `{` + macro + `.name(params)` + `}`
fn parse_macro_function(text: &str, parse_macro: impl Fn(&str) -> Option<usize>) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }

    let mut pos = 1 + parse_macro(&text[1..])?;
    if bytes.get(pos) != Some(&b'.') {
        return None;
    }
    pos += 1;

    let func_len = bytes[pos..]
        .iter()
        .take_while(|b| b.is_ascii_lowercase())
        .count();
    if func_len == 0 || bytes.get(pos + func_len) != Some(&b'(') {
        return None;
    }
    pos = parse_function_params(text, pos + func_len + 1)?;

    (bytes.get(pos) == Some(&b'}')).then_some(pos + 1)
}

/// Parse a parameter list after the opening parenthesis; returns the
/// position after the closing one.
fn parse_function_params(text: &str, mut pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();

    loop {
        pos = skip_spaces(bytes, pos);

        if bytes.get(pos) == Some(&b'"') {
            let (_, after) = parse_quoted(text, pos)?;
            pos = skip_spaces(bytes, after);
        } else {
            while let Some(&b) = bytes.get(pos) {
                if b == b',' || b == b')' {
                    break;
                }
                pos += 1;
            }
        }

        match bytes.get(pos) {
            Some(b',') => pos += 1,
            Some(b')') => return Some(pos + 1),
            _ => return None,
        }
    }
}

/// Parse an LLD macro or LLD macro function at the start of `text`.
pub fn parse_any_lld_macro(text: &str) -> Option<usize> {
    parse_lld_macro(text).or_else(|| parse_lld_macro_function(text))
}

/// Whether the whole of `text` is one LLD macro.
pub fn is_lld_macro(text: &str) -> bool {
    parse_lld_macro(text) == Some(text.len())
}

/// Whether the whole of `text` is one LLD macro or LLD macro function.
pub fn is_any_lld_macro(text: &str) -> bool {
    parse_any_lld_macro(text) == Some(text.len())
}
