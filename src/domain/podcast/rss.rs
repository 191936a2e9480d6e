use super::model::{Episode, PodcastConfig};
use quick_xml::escape::escape;
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

const DEFAULT_TITLE: &str = "Daily Gospel";
const DEFAULT_DESCRIPTION: &str = "Daily Gospel readings";
const CATEGORY: &str = "Religion & Spirituality";

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").expect("control char regex should compile")
});

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{1F300}-\x{1FAFF}\x{1F600}-\x{1F64F}]").expect("emoji regex should compile")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Make episode text safe for a feed: control characters become spaces,
/// emoji are dropped and whitespace is collapsed.
pub fn sanitize(text: &str) -> String {
    let text = CONTROL_CHARS.replace_all(text, " ");
    let text = EMOJI.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn element(out: &mut String, indent: usize, name: &str, text: &str) {
    let _ = writeln!(out, "{:indent$}<{name}>{}</{name}>", "", escape(text), indent = indent);
}

/// Render the podcast RSS 2.0 document with iTunes extensions.
///
/// Episodes are written in the order given; callers keep them newest first.
pub fn render_feed(config: &PodcastConfig, episodes: &[Episode]) -> String {
    let info = &config.podcast_info;
    let title = or_default(&info.title, DEFAULT_TITLE);
    let description = or_default(&info.description, DEFAULT_DESCRIPTION);
    let author = or_default(&info.author, title);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(concat!(
        "<rss version=\"2.0\"",
        " xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\"",
        " xmlns:content=\"http://purl.org/rss/1.0/modules/content/\"",
        " xmlns:atom=\"http://www.w3.org/2005/Atom\">\n"
    ));
    out.push_str("  <channel>\n");

    element(&mut out, 4, "title", title);
    element(&mut out, 4, "description", description);
    element(&mut out, 4, "link", &info.website);
    element(&mut out, 4, "language", config.language.as_str());
    element(&mut out, 4, "itunes:author", author);
    element(&mut out, 4, "itunes:summary", description);
    element(&mut out, 4, "itunes:explicit", "no");
    let _ = writeln!(out, "    <itunes:category text=\"{}\"/>", escape(CATEGORY));

    if !info.email.trim().is_empty() {
        out.push_str("    <itunes:owner>\n");
        element(&mut out, 6, "itunes:name", author);
        element(&mut out, 6, "itunes:email", &info.email);
        out.push_str("    </itunes:owner>\n");
        element(
            &mut out,
            4,
            "managingEditor",
            &format!("{} ({})", info.email, author),
        );
    }

    if !info.cover_art.trim().is_empty() {
        let _ = writeln!(out, "    <itunes:image href=\"{}\"/>", escape(&info.cover_art));
        out.push_str("    <image>\n");
        element(&mut out, 6, "url", &info.cover_art);
        element(&mut out, 6, "title", title);
        element(&mut out, 6, "link", &info.website);
        out.push_str("    </image>\n");
    }

    if !info.rss_url.trim().is_empty() {
        let _ = writeln!(
            out,
            "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>",
            escape(&info.rss_url)
        );
    }

    for episode in episodes {
        render_item(&mut out, episode);
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

fn render_item(out: &mut String, episode: &Episode) {
    let title = sanitize(&episode.title);
    let description = sanitize(&episode.description);

    out.push_str("    <item>\n");
    element(out, 6, "title", &title);
    element(out, 6, "description", &description);
    element(out, 6, "itunes:summary", &description);
    element(out, 6, "link", &episode.audio_url);
    let _ = writeln!(
        out,
        "      <enclosure url=\"{}\" length=\"{}\" type=\"audio/mpeg\"/>",
        escape(&episode.audio_url),
        episode.length
    );
    let _ = writeln!(
        out,
        "      <guid isPermaLink=\"false\">{}</guid>",
        escape(&episode.guid)
    );
    element(out, 6, "pubDate", &episode.pub_date);
    if episode.duration > 0 {
        element(out, 6, "itunes:duration", &episode.duration.to_string());
    }
    out.push_str("    </item>\n");
}
