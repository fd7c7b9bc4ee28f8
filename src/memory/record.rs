//! Memory record data types
//!
//! A `MemoryRecord` is the single journaled entity. Records are created only
//! by the store's `add` and never edited afterwards; `searchable_text` is a
//! derived lower-case copy of `content` that is recomputed whenever a record
//! is built or loaded.

use super::emotion::Emotion;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags offered by the input form as one-click choices
pub const QUICK_TAGS: [&str; 4] = ["Personal", "Insight", "People", "Work"];

/// A single journaled memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Unique, strictly increasing identifier (creation time in ms)
    pub id: u64,
    /// The memory text
    pub content: String,
    /// Chosen or detected emotion
    pub emotion: Emotion,
    /// Labels in insertion order, without duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// Display summary derived from content
    #[serde(default)]
    pub ai_summary: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    searchable_text: String,
}

impl MemoryRecord {
    pub(crate) fn new(
        id: u64,
        content: String,
        emotion: Emotion,
        tags: Vec<String>,
        ai_summary: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let searchable_text = content.to_lowercase();
        Self {
            id,
            content,
            emotion,
            tags,
            ai_summary,
            timestamp,
            searchable_text,
        }
    }

    /// Lower-cased content used for matching
    pub fn searchable_text(&self) -> &str {
        &self.searchable_text
    }

    /// Whether any tag contains `needle_lower` case-insensitively
    pub fn has_tag_matching(&self, needle_lower: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle_lower))
    }

    /// Recompute derived fields after deserialization.
    ///
    /// Records written by older builds may lack a summary; it is regenerated
    /// with `summarize`.
    pub(crate) fn refresh_derived(&mut self, summarize: impl Fn(&str) -> String) {
        self.searchable_text = self.content.to_lowercase();
        if self.ai_summary.is_empty() {
            self.ai_summary = summarize(&self.content);
        }
    }
}

/// Input for creating a memory
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemory {
    /// Raw memory text (trimmed on add)
    pub content: String,
    /// Emotion picked by the user; `None` or `neutral` means "detect"
    #[serde(default)]
    pub emotion: Option<Emotion>,
    /// Tags in the order they were selected
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewMemory {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            emotion: None,
            tags: Vec::new(),
        }
    }

    pub fn emotion(mut self, emotion: Emotion) -> Self {
        self.emotion = Some(emotion);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Trim tags, drop empty ones and duplicates, keep first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Validate content at the input boundary.
///
/// Content must be non-empty after trimming and at most `max_chars`
/// characters long (counted on the trimmed text).
pub fn validate_content(content: &str, max_chars: usize) -> Result<()> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("memory content must not be empty".to_string()));
    }
    let len = trimmed.chars().count();
    if len > max_chars {
        return Err(Error::Validation(format!(
            "memory content is {} characters, the limit is {}",
            len, max_chars
        )));
    }
    Ok(())
}

/// Hands out time-derived ids that never repeat within a store.
///
/// An id is the current time in milliseconds, bumped past the last issued id
/// when two memories land in the same millisecond (or the clock steps back).
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start after the largest id already in use
    pub fn starting_after(max_existing: u64) -> Self {
        Self { last: max_existing }
    }

    /// Next id for a memory created at `now`
    pub fn next(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
