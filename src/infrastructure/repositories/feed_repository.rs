use crate::domain::feed::RawFeedEntry;
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::time::Duration;

/// Source of raw feed entries
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Entries of the feed at `feed_url`, in document order (newest first)
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>, String>;
}

/// Fetches RSS 2.0 and Atom documents over HTTP
pub struct HttpFeedRepository {
    http_client: reqwest::Client,
}

impl HttpFeedRepository {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("GospelPodcast-Backend")
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl FeedRepository for HttpFeedRepository {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>, String> {
        let response = self
            .http_client
            .get(feed_url)
            .send()
            .await
            .map_err(|e| format!("Feed request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(feed_url = %feed_url, status = %status, "Feed request rejected");
            return Err(format!("Feed request failed with status {}", status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read feed body: {}", e))?;

        parse_feed(&body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EntryField {
    Title,
    Summary,
    Description,
    Link,
    Published,
}

fn entry_field(name: &[u8]) -> Option<EntryField> {
    match name {
        b"title" => Some(EntryField::Title),
        b"content:encoded" | b"summary" | b"content" => Some(EntryField::Summary),
        b"description" => Some(EntryField::Description),
        b"link" => Some(EntryField::Link),
        b"pubDate" | b"published" | b"updated" | b"dc:date" => Some(EntryField::Published),
        _ => None,
    }
}

/// The first value seen for a field wins
fn set_field(entry: &mut RawFeedEntry, field: EntryField, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    let slot = match field {
        EntryField::Title => {
            if entry.title.is_empty() {
                entry.title = value.to_string();
            }
            return;
        }
        EntryField::Summary => &mut entry.summary,
        EntryField::Description => &mut entry.description,
        EntryField::Link => &mut entry.link,
        EntryField::Published => &mut entry.published,
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Atom links carry the target in `href`; only the alternate link counts.
fn link_href(element: &BytesStart) -> Option<String> {
    let mut href = None;
    let mut rel = None;
    for attr in element.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"href" => href = Some(String::from_utf8_lossy(&attr.value).to_string()),
            b"rel" => rel = Some(String::from_utf8_lossy(&attr.value).to_string()),
            _ => {}
        }
    }
    match rel.as_deref() {
        None | Some("alternate") => href,
        _ => None,
    }
}

/// Parse an RSS 2.0 or Atom document into raw entries.
///
/// Text may arrive escaped or as CDATA. HTML entities such as `&nbsp;` are
/// resolved here; text that still fails to unescape is kept as written for the
/// HTML stripper to decode.
pub fn parse_feed(xml: &str) -> Result<Vec<RawFeedEntry>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<RawFeedEntry> = None;
    let mut field: Option<(EntryField, Vec<u8>)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                match name.as_ref() {
                    b"item" | b"entry" => {
                        current = Some(RawFeedEntry::default());
                        field = None;
                    }
                    tag => {
                        let Some(entry) = current.as_mut() else {
                            continue;
                        };
                        if field.is_some() {
                            continue;
                        }
                        if let Some(found) = entry_field(tag) {
                            if found == EntryField::Link {
                                if let Some(href) = link_href(&e) {
                                    set_field(entry, found, &href);
                                }
                            }
                            field = Some((found, tag.to_vec()));
                            text.clear();
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    if e.name().as_ref() == b"link" {
                        if let Some(href) = link_href(&e) {
                            set_field(entry, EntryField::Link, &href);
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    match e.unescape() {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let closes_field = matches!(&field, Some((_, tag)) if tag.as_slice() == name.as_ref());
                if closes_field {
                    if let (Some((found, _)), Some(entry)) = (field.take(), current.as_mut()) {
                        set_field(entry, found, &text);
                    }
                    text.clear();
                } else if matches!(name.as_ref(), b"item" | b"entry") {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "Invalid feed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
    }

    Ok(entries)
}
