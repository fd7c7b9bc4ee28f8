//! Free-text search over memories
//!
//! A memory matches when its lower-cased content contains the lower-cased
//! query, or when any of its tags does. A blank query matches everything.

use super::record::MemoryRecord;
use regex::RegexBuilder;

/// Filter records by a free-text query, keeping their relative order.
pub fn filter<'a>(records: &'a [MemoryRecord], query: &str) -> Vec<&'a MemoryRecord> {
    if query.trim().is_empty() {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.searchable_text().contains(&needle) || r.has_tag_matching(&needle))
        .collect()
}

/// A run of text that either matched the query or did not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` into segments, marking case-insensitive occurrences of
/// `query`. The query is matched literally.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    let unmatched = vec![Segment {
        text,
        matched: false,
    }];
    if query.is_empty() {
        return unmatched;
    }

    let re = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::debug!("Highlight disabled for query {:?}: {}", query, e);
            return unmatched;
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for m in re.find_iter(text) {
        if m.start() > cursor {
            segments.push(Segment {
                text: &text[cursor..m.start()],
                matched: false,
            });
        }
        segments.push(Segment {
            text: m.as_str(),
            matched: true,
        });
        cursor = m.end();
    }
    if cursor < text.len() {
        segments.push(Segment {
            text: &text[cursor..],
            matched: false,
        });
    }
    if segments.is_empty() {
        return unmatched;
    }
    segments
}
