//! Post and draft construction: dates, date permalink tokens, and excerpts.

use crate::config::{Config, Timezone};
use crate::document::Document;
use crate::util::{get_str, set};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_yaml::Value;

/// Finishes a post or draft.
///
/// The date comes from the `date` field, else from a `YYYY-MM-DD-` file name
/// prefix, else from the file's modification time. The title defaults to the
/// file name without that prefix.
pub(crate) fn init(doc: &mut Document, config: &Config) {
    let tz = config.timezone;
    let basename = doc.tokens[":basename"].clone();
    let (prefix, file_title) = match split_date_prefix(&basename) {
        Some((date, rest)) => (Some(date), rest.to_owned()),
        None => (None, basename.clone()),
    };

    let explicit = doc.data.get("date").and_then(|v| {
        let parsed = parse_date(v, tz);
        if parsed.is_none() && !v.is_null() {
            log::warn!(
                "unrecognized date {:?} in `{}`; using the file name or modification time",
                v,
                doc.path.display()
            );
        }
        parsed
    });
    let date = explicit
        .or_else(|| prefix.and_then(|d| midnight(d, tz)))
        .unwrap_or_else(|| tz.localize(&doc.timestamps.modified));
    if explicit.is_none() {
        let value = match prefix {
            Some(d) if midnight(d, tz).is_some() => d.format("%Y-%m-%d").to_string(),
            _ => date.to_rfc3339(),
        };
        set(&mut doc.data, "date", value);
    }
    doc.date = Some(date);

    if doc.title().is_none() {
        set(&mut doc.data, "title", file_title.clone());
    }
    doc.apply_defaults();

    let slug = get_str(&doc.data, "slug").map(str::to_owned);
    let mut token = |name: &str, format: &str| {
        doc.tokens
            .insert(format!(":{}", name), date.format(format).to_string());
    };
    token("year", "%Y");
    token("month", "%m");
    token("i_month", "%-m");
    token("day", "%d");
    token("i_day", "%-d");
    token("short_year", "%y");
    token("hour", "%H");
    token("minute", "%M");
    token("second", "%S");
    doc.tokens.insert(
        String::from(":title"),
        slug.clone().unwrap_or_else(|| file_title.clone()),
    );
    doc.tokens.insert(
        String::from(":slug"),
        slug.unwrap_or_else(|| slug::slugify(&file_title)),
    );
}

/// Splits `YYYY-MM-DD-rest` into the date and `rest`. Returns `None` when the
/// name doesn't start with a well-formed, valid date followed by `-`.
pub fn split_date_prefix(name: &str) -> Option<(NaiveDate, &str)> {
    let bytes = name.as_bytes();
    if bytes.len() < 11 {
        return None;
    }
    let shape_ok = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok || bytes[10] != b'-' {
        return None;
    }
    let date = NaiveDate::parse_from_str(&name[..10], "%Y-%m-%d").ok()?;
    Some((date, &name[11..]))
}

fn midnight(date: NaiveDate, tz: Timezone) -> Option<DateTime<FixedOffset>> {
    tz.from_local(&date.and_hms_opt(0, 0, 0)?)
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a front-matter date. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS +ZZZZ`,
/// and offset-less date-times or plain dates, which are read in `tz`. The
/// result carries the offset `tz` has at that instant.
pub fn parse_date(value: &Value, tz: Timezone) -> Option<DateTime<FixedOffset>> {
    let s = value.as_str()?.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(tz.localize(&date));
    }
    if let Ok(date) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(tz.localize(&date));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return tz.from_local(&naive);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| midnight(date, tz))
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn is_void(name: &[u8]) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|v| v.as_bytes().eq_ignore_ascii_case(name))
}

fn is_paragraph(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"p")
}

// Start tags that implicitly close an open `<p>`.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

fn is_block(name: &[u8]) -> bool {
    BLOCK_ELEMENTS
        .iter()
        .any(|b| b.as_bytes().eq_ignore_ascii_case(name))
}

fn closed(paragraph: &str) -> String {
    format!("{}</p>", paragraph.trim_end())
}

/// Returns the first top-level `<p>` element of an HTML fragment, markup
/// included, or an empty string when there is none. A paragraph without its
/// end tag ends where HTML would close it: at the next block-level start tag,
/// at an unmatched end tag, or at the end of the fragment. The missing `</p>`
/// is added.
pub fn first_paragraph(html: &str) -> String {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader.config_mut().allow_unmatched_ends = true;

    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    let mut inner = 0usize;
    loop {
        let before = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                log::debug!("excerpt: stopped reading HTML: {}", err);
                break;
            }
        };

        let begin = match start {
            Some(begin) => begin,
            None => {
                match event {
                    Event::Start(e) => {
                        let name = e.name();
                        if depth == 0 && is_paragraph(name.as_ref()) {
                            start = Some(before);
                        } else if !is_void(name.as_ref()) {
                            depth += 1;
                        }
                    }
                    Event::End(_) => depth = depth.saturating_sub(1),
                    Event::Eof => break,
                    _ => {}
                }
                continue;
            }
        };

        match event {
            Event::Start(e) | Event::Empty(e) if is_block(e.name().as_ref()) => {
                return closed(&html[begin..before]);
            }
            Event::Start(e) if !is_void(e.name().as_ref()) => inner += 1,
            Event::End(e) if is_paragraph(e.name().as_ref()) => {
                let end = reader.buffer_position() as usize;
                return html[begin..end].to_owned();
            }
            Event::End(_) if inner == 0 => return closed(&html[begin..before]),
            Event::End(_) => inner -= 1,
            Event::Eof => break,
            _ => {}
        }
    }

    match start {
        Some(begin) => closed(&html[begin..]),
        None => String::new(),
    }
}
