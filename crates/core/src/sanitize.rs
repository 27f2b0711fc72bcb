#![forbid(unsafe_code)]

//! Ingestion-time sanitizer. Stored messages are rendered verbatim, so the
//! stored form itself must be safe to drop into a page.
//!
//! Only a small safelist of inline tags survives. Everything else that looks
//! like markup is kept as literal text: device logs routinely contain strings
//! such as `<file.mm : 48592>` and those must read the same after a round trip.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const ALLOWED_TAGS: &[&str] = &[
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "p",
    "a",
    "ul",
    "ol",
    "nl",
    "li",
    "b",
    "i",
    "strong",
    "em",
    "strike",
    "code",
    "hr",
    "br",
    "pre",
    "span",
];

const VOID_TAGS: &[&str] = &["br", "hr"];
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto"];

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)((?:\s+[^<>]*)?)\s*(/?)>").expect("tag pattern")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .expect("attribute pattern")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);").expect("entity pattern")
});

/// Returns a render-safe copy of `input`. Never fails: anything that is not a
/// safelisted tag is escaped, never rejected.
pub fn make_safe(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut open: Vec<&'static str> = Vec::new();
    let mut cursor = 0;

    for caps in TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut out, &input[cursor..whole.start()]);
        cursor = whole.end();

        let name = caps[2].to_ascii_lowercase();
        let Some(tag) = allowed_tag(&name) else {
            push_text(&mut out, whole.as_str());
            continue;
        };

        if !caps[1].is_empty() {
            // Closing tags without a matching opener are dropped.
            if let Some(pos) = open.iter().rposition(|candidate| *candidate == tag) {
                for unclosed in open.drain(pos..).rev() {
                    push_close(&mut out, unclosed);
                }
            }
            continue;
        }

        out.push('<');
        out.push_str(tag);
        push_attributes(&mut out, tag, &caps);
        out.push('>');
        if !VOID_TAGS.contains(&tag) {
            open.push(tag);
        }
    }

    push_text(&mut out, &input[cursor..]);
    for unclosed in open.into_iter().rev() {
        push_close(&mut out, unclosed);
    }
    out
}

fn allowed_tag(name: &str) -> Option<&'static str> {
    ALLOWED_TAGS.iter().copied().find(|tag| *tag == name)
}

fn allowed_attribute(tag: &str, attribute: &str) -> bool {
    matches!((tag, attribute), ("a", "href") | ("span", "class"))
}

fn push_attributes(out: &mut String, tag: &str, caps: &Captures<'_>) {
    let raw = caps.get(3).map_or("", |m| m.as_str());
    for attr in ATTRIBUTE.captures_iter(raw) {
        let name = attr[1].to_ascii_lowercase();
        if !allowed_attribute(tag, &name) {
            continue;
        }
        let Some(value) = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4)) else {
            continue;
        };
        // Judge the value the browser will see, then re-escape every `&` so no
        // reference in the output can decode into a scheme separator.
        let value = decode_references(value.as_str());
        if name == "href" && !is_safe_href(&value) {
            continue;
        }
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        push_attribute_value(out, &value);
        out.push('"');
    }
}

fn is_safe_href(value: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme, so
    // `java\tscript:` must be judged as `javascript:`.
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let scheme_end = compact.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(index) if compact[index..].starts_with(':') => {
            let scheme = compact[..index].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

fn push_close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn push_text(out: &mut String, text: &str) {
    for (index, ch) in text.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if ENTITY.is_match(&text[index..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
}

fn push_attribute_value(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Resolves numeric references and the named ones that matter inside a URL.
/// Unknown names stay literal; they are escaped on output anyway.
fn decode_references(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = ENTITY
            .find(rest)
            .and_then(|m| decode_reference(m.as_str()).map(|ch| (ch, m.end())));
        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    let body = reference.strip_prefix('&')?.strip_suffix(';')?;
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "colon" => Some(':'),
        "sol" => Some('/'),
        "num" => Some('#'),
        "quest" => Some('?'),
        "Tab" => Some('\t'),
        "NewLine" => Some('\n'),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
