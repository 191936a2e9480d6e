use super::language::LanguageCode;
use regex::Regex;
use std::sync::LazyLock;

/// Per-language clean-up applied after abbreviation expansion.
///
/// The default implementation leaves text alone; a language overrides it
/// only when its liturgical texts read badly when spoken verbatim.
pub trait TextSmoother: Send + Sync {
    fn smooth(&self, text: &str, _flatten_lines: bool) -> String {
        text.to_string()
    }
}

/// No language-specific rules
pub struct Passthrough;

impl TextSmoother for Passthrough {}

static RESPONSE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bR\.\s*").expect("RESPONSE_MARKER regex should compile"));
static SENTENCE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\s|$)").expect("SENTENCE_PERIOD regex should compile"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("LINE_BREAK regex should compile"));
static EXTRA_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("EXTRA_SPACE regex should compile"));
static EXTRA_HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]{2,}").expect("EXTRA_HORIZONTAL_SPACE regex should compile")
});

/// Italian liturgy: drops the "R." response cue and sentence-final periods.
pub struct ItalianLiturgySmoother;

impl TextSmoother for ItalianLiturgySmoother {
    fn smooth(&self, text: &str, flatten_lines: bool) -> String {
        if text.is_empty() {
            return String::new();
        }

        let smoothed = RESPONSE_MARKER.replace_all(text, "");
        let smoothed = SENTENCE_PERIOD.replace_all(&smoothed, "${1}");

        let smoothed = if flatten_lines {
            let flat = LINE_BREAK.replace_all(&smoothed, " ");
            EXTRA_SPACE.replace_all(&flat, " ").into_owned()
        } else {
            let lines = LINE_BREAK.replace_all(&smoothed, "\n");
            let collapsed = EXTRA_HORIZONTAL_SPACE.replace_all(&lines, " ");
            // Collapsing can leave a space next to a newline
            LINE_BREAK.replace_all(&collapsed, "\n").into_owned()
        };

        smoothed.trim().to_string()
    }
}

static PASSTHROUGH: Passthrough = Passthrough;
static ITALIAN_LITURGY: ItalianLiturgySmoother = ItalianLiturgySmoother;

/// The smoother registered for a language.
pub fn smoother_for(language: LanguageCode) -> &'static dyn TextSmoother {
    match language {
        LanguageCode::Italian => &ITALIAN_LITURGY,
        _ => &PASSTHROUGH,
    }
}
