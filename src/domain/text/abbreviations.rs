//! Scripture book abbreviations and their spoken expansions.
//!
//! Feeds cite readings as "1 Cor 5, 7" or "Gv 3, 16". A speech engine would
//! spell those out letter by letter, so each language gets a table of book
//! abbreviations and one compiled pattern that finds them.

use super::language::LanguageCode;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

const ITALIAN: &[(&str, &str)] = &[
    ("mt", "Matteo"),
    ("mc", "Marco"),
    ("lc", "Luca"),
    ("gv", "Giovanni"),
    ("at", "Atti degli Apostoli"),
    ("rm", "Lettera ai Romani"),
    ("1cor", "Prima lettera ai Corinzi"),
    ("2cor", "Seconda lettera ai Corinzi"),
    ("gal", "Lettera ai Galati"),
    ("ef", "Lettera agli Efesini"),
    ("fil", "Lettera ai Filippesi"),
    ("col", "Lettera ai Colossesi"),
    ("1ts", "Prima lettera ai Tessalonicesi"),
    ("2ts", "Seconda lettera ai Tessalonicesi"),
    ("1tm", "Prima lettera a Timoteo"),
    ("2tm", "Seconda lettera a Timoteo"),
    ("tt", "Lettera a Tito"),
    ("fm", "Lettera a Filemone"),
    ("eb", "Lettera agli Ebrei"),
    ("gc", "Lettera di Giacomo"),
    ("1pt", "Prima lettera di Pietro"),
    ("2pt", "Seconda lettera di Pietro"),
    ("1gv", "Prima lettera di Giovanni"),
    ("2gv", "Seconda lettera di Giovanni"),
    ("3gv", "Terza lettera di Giovanni"),
    ("gd", "Lettera di Giuda"),
    ("ap", "Apocalisse"),
    ("sir", "Siràcide"),
    ("sap", "Sapienza"),
    ("qo", "Qoelet"),
    ("ct", "Cantico dei Cantici"),
    ("is", "Isaia"),
    ("ger", "Geremia"),
    ("lam", "Lamentazioni"),
    ("bar", "Baruc"),
    ("ez", "Ezechiele"),
    ("dn", "Daniele"),
    ("os", "Osea"),
    ("gl", "Gioele"),
    ("am", "Amos"),
    ("ab", "Abacuc"),
    ("sof", "Sofonia"),
    ("ag", "Aggeo"),
    ("zc", "Zaccaria"),
    ("ml", "Malachia"),
    ("sal", "Salmo"),
];

const ENGLISH: &[(&str, &str)] = &[
    ("mt", "Matthew"),
    ("mk", "Mark"),
    ("lk", "Luke"),
    ("jn", "John"),
    ("acts", "Acts"),
    ("rom", "Romans"),
    ("1cor", "First Corinthians"),
    ("2cor", "Second Corinthians"),
    ("1thes", "First Thessalonians"),
    ("2thes", "Second Thessalonians"),
    ("1tim", "First Timothy"),
    ("2tim", "Second Timothy"),
    ("heb", "Hebrews"),
    ("jas", "James"),
    ("1pet", "First Peter"),
    ("2pet", "Second Peter"),
    ("1jn", "First John"),
    ("2jn", "Second John"),
    ("3jn", "Third John"),
    ("rev", "Revelation"),
    ("ps", "Psalm"),
    ("sir", "Sirach"),
];

const SPANISH: &[(&str, &str)] = &[
    ("mt", "Mateo"),
    ("mc", "Marcos"),
    ("lc", "Lucas"),
    ("jn", "Juan"),
    ("hch", "Hechos"),
    ("rm", "Romanos"),
    ("1cor", "Primera carta a los Corintios"),
    ("2cor", "Segunda carta a los Corintios"),
    ("ap", "Apocalipsis"),
    ("sal", "Salmo"),
    ("sir", "Eclesiástico"),
];

const FRENCH: &[(&str, &str)] = &[
    ("mt", "Matthieu"),
    ("mc", "Marc"),
    ("lc", "Luc"),
    ("jn", "Jean"),
    ("rm", "Lettre aux Romains"),
    ("1cor", "Première lettre aux Corinthiens"),
    ("2cor", "Deuxième lettre aux Corinthiens"),
    ("ap", "Apocalypse"),
    ("ps", "Psaume"),
    ("sir", "Siracide"),
];

const PORTUGUESE: &[(&str, &str)] = &[
    ("mt", "Mateus"),
    ("mc", "Marcos"),
    ("lc", "Lucas"),
    ("jo", "João"),
    ("at", "Atos dos Apóstolos"),
    ("rm", "Romanos"),
    ("1cor", "Primeira carta aos Coríntios"),
    ("2cor", "Segunda carta aos Coríntios"),
    ("ap", "Apocalipse"),
    ("sl", "Salmo"),
    ("sir", "Eclesiástico"),
];

const GERMAN: &[(&str, &str)] = &[
    ("mt", "Matthäus"),
    ("mk", "Markus"),
    ("lk", "Lukas"),
    ("joh", "Johannes"),
    ("röm", "Römer"),
    ("1kor", "Erster Korintherbrief"),
    ("2kor", "Zweiter Korintherbrief"),
    ("offb", "Offenbarung"),
    ("ps", "Psalm"),
    ("sir", "Jesus Sirach"),
];

fn entries_for(language: LanguageCode) -> &'static [(&'static str, &'static str)] {
    match language {
        LanguageCode::Italian => ITALIAN,
        LanguageCode::English => ENGLISH,
        LanguageCode::Spanish => SPANISH,
        LanguageCode::French => FRENCH,
        LanguageCode::Portuguese => PORTUGUESE,
        LanguageCode::German => GERMAN,
    }
}

/// Lookup key for a matched token: lowercase, no periods, no whitespace.
///
/// "1 Cor", "1Cor." and "1cor" all canonicalize to "1cor".
pub fn canonical_ref_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One language's abbreviation dictionary plus the pattern compiled from it.
#[derive(Debug)]
pub struct AbbreviationTable {
    expansions: HashMap<&'static str, &'static str>,
    pattern: Option<Regex>,
}

impl AbbreviationTable {
    pub fn new(entries: &[(&'static str, &'static str)]) -> Self {
        let expansions: HashMap<&'static str, &'static str> = entries.iter().copied().collect();
        let pattern = build_pattern(expansions.keys().copied());
        Self { expansions, pattern }
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    pub fn expansion(&self, token: &str) -> Option<&'static str> {
        self.expansions.get(canonical_ref_token(token).as_str()).copied()
    }

    /// Replace every abbreviation in `text` with its full book name.
    pub fn expand(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };

        pattern
            .replace_all(text, |caps: &Captures| {
                let token = &caps[1];
                match self.expansion(token) {
                    Some(expansion) => expansion.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Compile the keys into one alternation, longest key first.
///
/// A key must start at a word boundary. One trailing period is absorbed when
/// nothing word-like follows it; otherwise the key has to end at a word
/// boundary on its own. Digit-prefixed keys accept whitespace after the digit.
fn build_pattern<'a>(keys: impl Iterator<Item = &'a str>) -> Option<Regex> {
    let mut keys: Vec<&str> = keys.filter(|key| !key.is_empty()).collect();
    if keys.is_empty() {
        return None;
    }
    keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

    let alternatives: Vec<String> = keys
        .iter()
        .map(|key| {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) if first.is_ascii_digit() => {
                    format!(r"{}\s*{}", first, regex::escape(chars.as_str()))
                }
                _ => regex::escape(key),
            }
        })
        .collect();

    let source = format!(r"(?i)\b({})(?:\.\B|\b)", alternatives.join("|"));
    match Regex::new(&source) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compile abbreviation pattern, expansion disabled");
            None
        }
    }
}

static TABLES: LazyLock<HashMap<LanguageCode, AbbreviationTable>> = LazyLock::new(|| {
    LanguageCode::ALL
        .into_iter()
        .map(|language| (language, AbbreviationTable::new(entries_for(language))))
        .collect()
});

/// The shared, read-only table for a language.
pub fn abbreviation_table(language: LanguageCode) -> Option<&'static AbbreviationTable> {
    TABLES.get(&language).filter(|table| !table.is_empty())
}

/// Expand scripture book abbreviations for the given language.
pub fn expand_bible_refs(text: &str, language: LanguageCode) -> String {
    if text.is_empty() {
        return String::new();
    }

    match abbreviation_table(language) {
        Some(table) => table.expand(text),
        None => text.to_string(),
    }
}
