//! Network addresses and integer range lists.

use super::macros::{parse_any_lld_macro, parse_user_macro, parse_user_macro_function};
use std::net::IpAddr;

/// Host macros that expand to an IP address.
pub const IP_HOST_MACROS: [&str; 2] = ["{HOST.IP}", "{HOST.CONN}"];

/// Host macros that may appear inside a DNS name.
pub const DNS_HOST_MACROS: [&str; 5] = [
    "{HOST.IP}",
    "{HOST.CONN}",
    "{HOST.DNS}",
    "{HOST.HOST}",
    "{HOST.NAME}",
];

/// Which kinds of macros a parser accepts in place of literal text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacroSupport {
    pub user: bool,
    pub lld: bool,
    pub host: bool,
}

impl MacroSupport {
    /// Length of an accepted macro at the start of `text`.
    fn parse(self, text: &str, host_macros: &[&str]) -> Option<usize> {
        if !text.starts_with('{') {
            return None;
        }
        if self.user {
            if let Some(len) = parse_user_macro(text)
                .map(|m| m.len)
                .or_else(|| parse_user_macro_function(text))
            {
                return Some(len);
            }
        }
        if self.lld {
            if let Some(len) = parse_any_lld_macro(text) {
                return Some(len);
            }
        }
        if self.host {
            return host_macros
                .iter()
                .find(|name| text.starts_with(*name))
                .map(|name| name.len());
        }
        None
    }

    /// Whether the whole of `text` is one accepted macro.
    fn is_macro(self, text: &str, host_macros: &[&str]) -> bool {
        self.parse(text, host_macros) == Some(text.len())
    }
}

/// IPv4 or IPv6 address, or a single accepted macro.
pub fn is_ip(text: &str, macros: MacroSupport) -> bool {
    macros.is_macro(text, &IP_HOST_MACROS) || text.parse::<IpAddr>().is_ok()
}

/// DNS name made of letters, digits, `_`, `-` and `.`, with accepted macros
/// allowed anywhere in it.
///
/// The first literal character must be a letter, a digit or `_`.
pub fn is_dns(text: &str, macros: MacroSupport) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some(len) = macros.parse(&text[pos..], &DNS_HOST_MACROS) {
            pos += len;
            continue;
        }

        let b = bytes[pos];
        let allowed = if pos == 0 {
            b.is_ascii_alphanumeric() || b == b'_'
        } else {
            b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
        };
        if !allowed {
            return false;
        }
        pos += 1;
    }

    pos > 0
}

/// One end of an integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound<'a> {
    /// Signed decimal literal, `-?[0-9]+`
    Number(&'a str),
    Macro(&'a str),
}

/// Parse a comma-separated list of `N` and `N-M` ranges, where either end
/// may be negative: `-100-0,0-100,200,300-{$MAX}`.
///
/// Spaces around list items are ignored. Returns the bounds of every range,
/// or `None` if the text is not a range list.
pub fn parse_int_ranges(text: &str, macros: MacroSupport) -> Option<Vec<Vec<Bound<'_>>>> {
    let mut ranges = Vec::new();

    for item in text.split(',') {
        let item = item.trim_matches(' ');
        let (low, rest) = parse_bound(item, macros)?;

        let range = if rest.is_empty() {
            vec![low]
        } else {
            let (high, rest) = parse_bound(rest.strip_prefix('-')?, macros)?;
            if !rest.is_empty() {
                return None;
            }
            vec![low, high]
        };
        ranges.push(range);
    }

    Some(ranges)
}

fn parse_bound(text: &str, macros: MacroSupport) -> Option<(Bound<'_>, &str)> {
    if let Some(len) = macros.parse(text, &[]) {
        return Some((Bound::Macro(&text[..len]), &text[len..]));
    }

    let sign = usize::from(text.starts_with('-'));
    let digits = text[sign..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }

    let end = sign + digits;
    Some((Bound::Number(&text[..end]), &text[end..]))
}
