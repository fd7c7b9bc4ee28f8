//! Insight aggregation over the memory journal
//!
//! Everything here is a pure function of the record slice (newest first) and
//! an explicit `now`, so results are reproducible in tests.
//!
//! Rankings count occurrences and sort by count descending. Ties keep the
//! order in which each key was first encountered.

use super::record::MemoryRecord;
use crate::config::{JournalConfig, MAX_WEEK_DAYS};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of observation an insight reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// The most frequent emotion
    EmotionalPattern,
    /// The most frequent tag among recent memories
    FocusArea,
    /// Memories captured during the last week
    ThisWeek,
}

impl InsightKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmotionalPattern => "Emotional Pattern",
            Self::FocusArea => "Focus Area",
            Self::ThisWeek => "This Week",
        }
    }
}

/// A human-readable observation derived from aggregate statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub content: String,
}

impl Insight {
    fn new(kind: InsightKind, content: String) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            content,
        }
    }
}

/// Summary numbers for the stats panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total: usize,
    pub this_week: usize,
    pub average_per_day: f64,
}

impl MemoryStats {
    /// Average per day with one decimal, as shown in the stats panel
    pub fn average_display(&self) -> String {
        if self.total == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.average_per_day)
        }
    }
}

/// Computes rankings, insights and stats with configurable windows.
#[derive(Debug, Clone, Default)]
pub struct InsightAggregator {
    config: JournalConfig,
}

impl InsightAggregator {
    pub fn new(config: JournalConfig) -> Self {
        Self { config }
    }

    /// Most frequent emotions as `(label, count)`.
    pub fn top_emotions(&self, records: &[MemoryRecord]) -> Vec<(String, usize)> {
        rank(records.iter().map(|r| r.emotion.as_str()), self.config.top_n)
    }

    /// Most frequent tags among the most recent memories.
    pub fn recent_focus_tags(&self, records: &[MemoryRecord]) -> Vec<(String, usize)> {
        rank(
            records
                .iter()
                .take(self.config.recent_window)
                .flat_map(|r| r.tags.iter().map(String::as_str)),
            self.config.top_n,
        )
    }

    /// Memories created strictly after `now - week_days`.
    pub fn this_week_count(&self, records: &[MemoryRecord], now: DateTime<Utc>) -> usize {
        let days = self.config.week_days.clamp(1, MAX_WEEK_DAYS);
        let cutoff = now - Duration::days(days);
        records.iter().filter(|r| r.timestamp > cutoff).count()
    }

    /// Derive the insight list. An empty journal has no insights at all.
    pub fn insights(&self, records: &[MemoryRecord], now: DateTime<Utc>) -> Vec<Insight> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut insights = Vec::new();

        if let Some((emotion, _)) = self.top_emotions(records).first() {
            insights.push(Insight::new(
                InsightKind::EmotionalPattern,
                format!("You are feeling {} most often recently", emotion),
            ));
        }

        if let Some((tag, _)) = self.recent_focus_tags(records).first() {
            insights.push(Insight::new(
                InsightKind::FocusArea,
                format!("{} has been on your mind lately", tag),
            ));
        }

        let this_week = self.this_week_count(records, now);
        if this_week > 0 {
            insights.push(Insight::new(
                InsightKind::ThisWeek,
                format!("{} memories captured - you are being mindful!", this_week),
            ));
        }

        insights
    }

    /// Totals for the stats panel.
    ///
    /// The average spreads the total over the whole days elapsed since the
    /// oldest memory (at least one day).
    pub fn stats(&self, records: &[MemoryRecord], now: DateTime<Utc>) -> MemoryStats {
        let total = records.len();
        let average_per_day = match records.last() {
            Some(oldest) => {
                let elapsed_ms = (now - oldest.timestamp).num_milliseconds().max(0) as f64;
                let days = (elapsed_ms / Duration::days(1).num_milliseconds() as f64)
                    .ceil()
                    .max(1.0);
                total as f64 / days
            }
            None => 0.0,
        };

        MemoryStats {
            total,
            this_week: self.this_week_count(records, now),
            average_per_day,
        }
    }
}

/// Count keys and keep the `limit` most frequent. Stable on ties.
fn rank<'a>(keys: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}
