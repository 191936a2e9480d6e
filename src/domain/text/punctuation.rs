use regex::Regex;
use std::sync::LazyLock;

static SPACE_BEFORE_MARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([,;:.!?])").expect("SPACE_BEFORE_MARK regex should compile")
});
static REPEATED_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:,\s*){2,}").expect("REPEATED_COMMA regex should compile"));
static REPEATED_SEMICOLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";(?:\s*;)+").expect("REPEATED_SEMICOLON regex should compile"));
static REPEATED_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(?:\s*:)+").expect("REPEATED_COLON regex should compile"));
static REPEATED_BANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!(?:\s*!)+").expect("REPEATED_BANG regex should compile"));
static REPEATED_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?(?:\s*\?)+").expect("REPEATED_QUESTION regex should compile"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("LINE_BREAK regex should compile"));
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("HORIZONTAL_SPACE regex should compile"));

fn is_mark(c: char) -> bool {
    matches!(c, ',' | ';' | ':' | '.' | '!' | '?')
}

/// Put a single space after every mark that is glued to the next character.
fn space_after_marks(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        result.push(c);
        if is_mark(c) {
            if let Some(next) = chars.peek() {
                if !next.is_whitespace() {
                    result.push(' ');
                }
            }
        }
    }

    result
}

/// Make punctuation and whitespace predictable for a speech engine.
///
/// With `flatten_lines` every line break becomes a space, producing a single
/// spoken stream. Without it line breaks are kept (one `\n` each) so the
/// text can still be split into liturgical sections.
pub fn normalize_punctuation(text: &str, flatten_lines: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = SPACE_BEFORE_MARK.replace_all(text, "${1}");
    let normalized = space_after_marks(&normalized);

    let normalized = REPEATED_COMMA.replace_all(&normalized, ", ");
    let normalized = REPEATED_SEMICOLON.replace_all(&normalized, "; ");
    let normalized = REPEATED_COLON.replace_all(&normalized, ": ");
    let normalized = REPEATED_BANG.replace_all(&normalized, "! ");
    let normalized = REPEATED_QUESTION.replace_all(&normalized, "? ");

    let line_break = if flatten_lines { " " } else { "\n" };
    let normalized = LINE_BREAK.replace_all(&normalized, line_break);
    let normalized = HORIZONTAL_SPACE.replace_all(&normalized, " ");
    normalized.trim().to_string()
}
