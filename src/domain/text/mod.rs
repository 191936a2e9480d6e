//! Turns feed text into something a speech engine can read aloud.
//!
//! The pipeline runs markup stripping, punctuation clean-up, abbreviation
//! expansion and per-language smoothing, in that order. Every step is a total
//! function: bad input degrades to less processing, never to an error.

pub mod abbreviations;
pub mod html;
pub mod language;
pub mod punctuation;
pub mod segmenter;
pub mod smoothing;

pub use abbreviations::{abbreviation_table, expand_bible_refs, AbbreviationTable};
pub use html::{decode_html_entities, html_to_plain_text};
pub use language::{detect_language, LanguageCode, UnsupportedLanguage};
pub use punctuation::normalize_punctuation;
pub use segmenter::build_italian_liturgy_segments;
pub use smoothing::{smoother_for, TextSmoother};

/// Normalize raw feed text for speech.
///
/// `language` and `feed_url` are only used to work out the language; when
/// neither identifies one the text is stripped and punctuation-normalized but
/// not expanded or smoothed.
pub fn normalize_for_tts(
    text: &str,
    language: Option<&str>,
    feed_url: Option<&str>,
    flatten_lines: bool,
) -> String {
    let normalized = html_to_plain_text(text);
    let normalized = normalize_punctuation(&normalized, flatten_lines);

    match detect_language(language, feed_url) {
        Some(language) => {
            let expanded = expand_bible_refs(&normalized, language);
            smoother_for(language).smooth(&expanded, flatten_lines)
        }
        None => normalized,
    }
}
