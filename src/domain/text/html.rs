//! HTML to plain text conversion for feed content.
//!
//! Feed descriptions arrive as HTML fragments, sometimes encoded twice. The
//! conversion keeps paragraph structure as newlines so the liturgical
//! segmenter can still see where each reading starts.

use quick_xml::escape::unescape;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Upper bound on entity decoding passes (double-encoded feeds need two)
const MAX_DECODE_PASSES: usize = 3;

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:br|/p|/div|/li|/h[1-6])\s*/?>").expect("BLOCK_BREAK regex should compile")
});
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("LIST_ITEM regex should compile"));
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("ANY_TAG regex should compile"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,8});?|#[xX]([0-9a-fA-F]{1,7});?|([A-Za-z][A-Za-z0-9]{1,31})(;)?)")
        .expect("ENTITY regex should compile")
});
static WRAPPED_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)-\s+(\w)").expect("WRAPPED_HYPHEN regex should compile"));
static SPACE_AROUND_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\n\s*").expect("SPACE_AROUND_NEWLINE regex should compile")
});
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("HORIZONTAL_SPACE regex should compile"));

/// Names HTML allows without the closing `;` (the Latin-1 legacy set)
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Look a named reference up in the HTML5 entity table.
fn resolve_named(name: &str) -> Option<String> {
    let reference = format!("&{};", name);
    let value = unescape(&reference).ok()?;
    Some(value.into_owned())
}

/// Decode `&name;` or `&name`, falling back to the longest legacy prefix the
/// way browsers do (`&nbspb` is a no-break space then `b`).
fn decode_named(name: &str, terminated: bool) -> Option<String> {
    if terminated {
        if let Some(value) = resolve_named(name) {
            return Some(value);
        }
    }

    let prefix = LEGACY_ENTITIES
        .iter()
        .filter(|legacy| name.starts_with(**legacy))
        .max_by_key(|legacy| legacy.len())?;
    let value = resolve_named(prefix)?;
    let suffix = if terminated { ";" } else { "" };
    Some(format!("{}{}{}", value, &name[prefix.len()..], suffix))
}

/// Decode HTML character references, repeating until the text is stable.
///
/// Named references resolve against the full HTML5 table, including the
/// legacy forms written without `;`. Names HTML does not define are left as
/// written. Non-breaking spaces come out as ordinary spaces.
pub fn decode_html_entities(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let mut decoded = value.to_string();
    for _ in 0..MAX_DECODE_PASSES {
        let newer = decode_once(&decoded);
        if newer == decoded {
            break;
        }
        decoded = newer;
    }

    decoded.replace('\u{a0}', " ")
}

fn decode_once(value: &str) -> String {
    ENTITY
        .replace_all(value, |caps: &Captures| {
            if let Some(decimal) = caps.get(1) {
                return code_point(decimal.as_str().parse().ok());
            }
            if let Some(hex) = caps.get(2) {
                return code_point(u32::from_str_radix(hex.as_str(), 16).ok());
            }
            let name = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            decode_named(name, caps.get(4).is_some()).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn code_point(value: Option<u32>) -> String {
    value
        .filter(|&v| v != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

fn strip_markup(value: &str) -> String {
    let text = BLOCK_BREAK.replace_all(value, "\n");
    let text = LIST_ITEM.replace_all(&text, "- ");
    ANY_TAG.replace_all(&text, " ").into_owned()
}

/// Convert an HTML fragment into plain text with one newline per block.
pub fn html_to_plain_text(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let text = strip_markup(value);
    let text = decode_html_entities(&text);
    // Double-encoded markup only becomes visible after decoding
    let text = if ANY_TAG.is_match(&text) {
        strip_markup(&text)
    } else {
        text
    };

    let text = WRAPPED_HYPHEN.replace_all(&text, "${1}${2}");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    text.trim().to_string()
}
