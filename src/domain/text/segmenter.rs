use super::normalize_for_tts;
use regex::Regex;
use std::sync::LazyLock;

static FIRST_READING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^prima\s+lettura").expect("FIRST_READING regex should compile"));
static PSALM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^salmo\s+responsoriale").expect("PSALM regex should compile")
});
static GOSPEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dal\s+vangelo|^vangelo").expect("GOSPEL regex should compile"));
static GOSPEL_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dal\s+vangelo").expect("GOSPEL_START regex should compile"));
static TRAILING_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^()]+)\)\s*$").expect("TRAILING_ANNOTATION regex should compile")
});
static PAPAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)francesco|benedetto|giovanni\s+paolo|paolo\s+vi|papa")
        .expect("PAPAL_NAME regex should compile")
});
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0b\x0c\x1c-\x1e\x{85}\x{2028}\x{2029}]")
        .expect("LINE_BREAK regex should compile")
});
static PAPA_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpapa\b").expect("PAPA_WORD regex should compile"));

/// A commentary line split into who said it and what was said
#[derive(Debug, PartialEq)]
struct Attribution<'a> {
    author: &'a str,
    body: &'a str,
}

fn find_line(lines: &[&str], pattern: &Regex) -> Option<usize> {
    lines.iter().position(|line| pattern.is_match(line))
}

fn join_lines(lines: &[&str], start: usize, end: usize) -> String {
    lines
        .get(start..end)
        .map(|span| span.join("\n"))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Recognize "<body> (<pope>)" at the end of a line.
fn papal_attribution(line: &str) -> Option<Attribution<'_>> {
    let line = line.trim();
    let caps = TRAILING_ANNOTATION.captures(line)?;
    let author = caps.get(1)?.as_str().trim();
    if !PAPAL_NAME.is_match(author) {
        return None;
    }

    let start = caps.get(0)?.start();
    let body = line[..start].trim();
    let body = if body.is_empty() { line } else { body };
    Some(Attribution { author, body })
}

fn commentary_segment(attribution: &Attribution<'_>) -> String {
    let mut intro = attribution.author.replace(" - ", ", ");
    if !PAPA_WORD.is_match(&intro) {
        intro = format!("Papa {}", intro);
    }
    format!("Commentary by {}.\n{}", intro, attribution.body)
}

/// Split an Italian daily-readings description into speakable segments.
///
/// Returns the first reading, the gospel and an optional papal commentary,
/// in that order. When the description lacks either the first-reading or the
/// gospel marker the whole normalized text comes back as one segment. The
/// responsorial psalm only bounds the first reading and is not emitted.
pub fn build_italian_liturgy_segments(description: &str) -> Vec<String> {
    let text = normalize_for_tts(description, Some("it"), None, false);
    let lines: Vec<&str> = LINE_BREAK
        .split(&text)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(last_line) = lines.last() else {
        return vec![text];
    };

    let first_reading = find_line(&lines, &FIRST_READING);
    let psalm = find_line(&lines, &PSALM);
    let gospel = find_line(&lines, &GOSPEL);

    let (Some(first_reading), Some(gospel)) = (first_reading, gospel) else {
        tracing::debug!(lines = lines.len(), "No liturgical markers, keeping a single segment");
        return vec![text];
    };

    let attribution = papal_attribution(last_line);

    let first_reading_end = match psalm {
        Some(psalm) if psalm > first_reading => psalm,
        _ => gospel,
    };
    let first_reading_section = join_lines(&lines, first_reading, first_reading_end);

    let gospel_end = if attribution.is_some() {
        lines.len() - 1
    } else {
        lines.len()
    };
    let mut gospel_section = join_lines(&lines, gospel, gospel_end);
    if let Some(start) = GOSPEL_START.find(&gospel_section).map(|m| m.start()) {
        gospel_section = gospel_section[start..].trim().to_string();
    }

    let mut segments = Vec::with_capacity(3);
    if !first_reading_section.is_empty() {
        segments.push(first_reading_section);
    }
    if !gospel_section.is_empty() {
        segments.push(gospel_section);
    }
    if let Some(attribution) = attribution {
        segments.push(commentary_segment(&attribution));
    }

    if segments.is_empty() {
        return vec![text];
    }
    segments
}
