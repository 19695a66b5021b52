//! RSS feed parsing into episode records.
//!
//! A pull parser over the feed XML. Malformed individual items are skipped
//! and counted; only a fault in the document itself fails the whole parse.
//!
//! Per-item field mapping:
//! - id: `<itunes:episode>`, falling back to `<guid>` when it is numeric
//! - publication date: RFC 2822 `<pubDate>`, RFC 3339 accepted as fallback
//! - duration: `<itunes:duration>`, defaulting to `"00:00:00"`
//! - audio url and size: first `<enclosure>`, falling back to `<link>`
//! - guests: parallel `<aws:guest-name>` / `<aws:guest-title>` /
//!   `<aws:guest-link>` tags, zipped by position
//! - related links: anchors harvested from `<content:encoded>` show notes

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

use podsearch_core::model::{Episode, Guest};
use podsearch_core::Error;

use crate::feed::links::harvest_links;

/// Outcome of a full feed parse.
#[derive(Debug)]
pub struct ParsedFeed {
    pub episodes: Vec<Episode>,
    /// Items present in the document that could not be turned into episodes.
    pub skipped: usize,
}

/// Which item child element text is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    PubDate,
    EpisodeNumber,
    Duration,
    Guid,
    Link,
    ContentEncoded,
    GuestName,
    GuestTitle,
    GuestLink,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"description" => Some(Field::Description),
            b"pubDate" => Some(Field::PubDate),
            b"itunes:episode" => Some(Field::EpisodeNumber),
            b"itunes:duration" => Some(Field::Duration),
            b"guid" => Some(Field::Guid),
            b"link" => Some(Field::Link),
            b"content:encoded" => Some(Field::ContentEncoded),
            b"aws:guest-name" => Some(Field::GuestName),
            b"aws:guest-title" => Some(Field::GuestTitle),
            b"aws:guest-link" => Some(Field::GuestLink),
            _ => None,
        }
    }
}

/// Accumulated state for one `<item>` element.
#[derive(Debug, Default)]
struct ItemDraft {
    title: String,
    description: String,
    pub_date: String,
    episode_number: String,
    duration: String,
    guid: String,
    link: String,
    content_encoded: String,
    guest_names: Vec<String>,
    guest_titles: Vec<String>,
    guest_links: Vec<String>,
    enclosure_url: Option<String>,
    enclosure_length: Option<String>,
}

impl ItemDraft {
    fn field_buffer(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::PubDate => &mut self.pub_date,
            Field::EpisodeNumber => &mut self.episode_number,
            Field::Duration => &mut self.duration,
            Field::Guid => &mut self.guid,
            Field::Link => &mut self.link,
            Field::ContentEncoded => &mut self.content_encoded,
            // List-valued fields always append to the most recent entry;
            // a new entry is pushed when the element opens.
            Field::GuestName => self.guest_names.last_mut().unwrap_or(&mut self.title),
            Field::GuestTitle => self.guest_titles.last_mut().unwrap_or(&mut self.title),
            Field::GuestLink => self.guest_links.last_mut().unwrap_or(&mut self.title),
        }
    }

    fn open_field(&mut self, field: Field) {
        match field {
            Field::GuestName => self.guest_names.push(String::new()),
            Field::GuestTitle => self.guest_titles.push(String::new()),
            Field::GuestLink => self.guest_links.push(String::new()),
            _ => {}
        }
    }

    fn guests(&self) -> Vec<Guest> {
        let mut guests = Vec::new();
        for (i, name) in self.guest_names.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let title = self.guest_titles.get(i).map(|t| t.trim()).filter(|t| !t.is_empty());
            let profile_url = self.guest_links.get(i).map(|l| l.trim()).filter(|l| !l.is_empty());
            guests.push(Guest {
                name: name.to_string(),
                title: title.map(str::to_string),
                profile_url: profile_url.map(str::to_string),
            });
        }
        guests
    }

    /// Finalize the draft into an episode, or explain why it was skipped.
    fn build(self) -> Result<Episode, String> {
        let id = self
            .episode_number
            .trim()
            .parse::<u32>()
            .ok()
            .or_else(|| self.guid.trim().parse::<u32>().ok())
            .ok_or_else(|| format!("item '{}' has no usable episode id", self.title.trim()))?;

        let publication_date = parse_pub_date(&self.pub_date)
            .map_err(|e| format!("item '{}': {e}", self.title.trim()))?;

        let duration =
            if self.duration.trim().is_empty() { "00:00:00".to_string() } else { self.duration.trim().to_string() };

        let guests = self.guests();
        let links = harvest_links(&self.content_encoded);

        let (url, file_size) = match self.enclosure_url {
            Some(url) => {
                let size = self.enclosure_length.as_deref().and_then(|l| l.trim().parse::<u64>().ok()).unwrap_or(0);
                (url, size)
            }
            None => (self.link.trim().to_string(), 0),
        };

        Ok(Episode {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            publication_date,
            duration,
            url,
            file_size,
            guests,
            links,
        })
    }
}

fn parse_pub_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        tracing::warn!("item missing publication date, using current time");
        return Ok(Utc::now());
    }

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| format!("unparseable publication date '{raw}'"))
}

/// Parse an RSS document into episodes.
///
/// # Errors
///
/// Returns `Error::FeedParse` when the document itself is malformed or not
/// valid UTF-8. Malformed items inside a valid document are skipped.
pub fn parse_feed(xml: &[u8]) -> Result<ParsedFeed, Error> {
    let text = std::str::from_utf8(xml).map_err(|e| Error::FeedParse(format!("feed is not valid UTF-8: {e}")))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut episodes = Vec::new();
    let mut skipped = 0usize;
    let mut current: Option<ItemDraft> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Err(e) => return Err(Error::FeedParse(format!("XML error at byte {}: {e}", reader.buffer_position()))),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    current = Some(ItemDraft::default());
                    field = None;
                } else if let Some(draft) = current.as_mut() {
                    if name.as_ref() == b"enclosure" {
                        read_enclosure(&e, draft);
                    } else if let Some(f) = Field::from_name(name.as_ref()) {
                        draft.open_field(f);
                        field = Some(f);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"enclosure"
                    && let Some(draft) = current.as_mut()
                {
                    read_enclosure(&e, draft);
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(draft), Some(f)) = (current.as_mut(), field) {
                    let decoded = e.unescape().map_err(|err| Error::FeedParse(err.to_string()))?;
                    draft.field_buffer(f).push_str(&decoded);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(draft), Some(f)) = (current.as_mut(), field) {
                    draft.field_buffer(f).push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(draft) = current.take() {
                        match draft.build() {
                            Ok(episode) => episodes.push(episode),
                            Err(reason) => {
                                skipped += 1;
                                tracing::warn!(reason, "skipping feed item");
                            }
                        }
                    }
                    field = None;
                } else {
                    field = None;
                }
            }
            Ok(_) => {}
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, parsed = episodes.len(), "some feed items failed to parse");
    }

    Ok(ParsedFeed { episodes, skipped })
}

/// First enclosure wins; later ones are ignored.
fn read_enclosure(e: &quick_xml::events::BytesStart<'_>, draft: &mut ItemDraft) {
    if draft.enclosure_url.is_some() {
        return;
    }

    for attr in e.attributes().flatten() {
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => continue,
        };
        match attr.key.as_ref() {
            b"url" => draft.enclosure_url = Some(value),
            b"length" => draft.enclosure_length = Some(value),
            _ => {}
        }
    }
}
