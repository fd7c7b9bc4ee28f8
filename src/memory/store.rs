//! Memory store with whole-array slot persistence
//!
//! The store owns the ordered record collection (newest first) and mirrors it
//! into a `StorageSlot` after every mutation. Loading is best-effort: a missing
//! or unreadable slot starts an empty journal instead of failing.

use super::backend::StorageSlot;
use super::insight::{Insight, InsightAggregator, MemoryStats};
use super::record::{normalize_tags, IdGenerator, MemoryRecord, NewMemory};
use super::{emotion, search, summary};
use crate::config::JournalConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Owned journal state plus its persisted mirror
pub struct MemoryStore {
    slot: Box<dyn StorageSlot>,
    records: Vec<MemoryRecord>,
    ids: IdGenerator,
    config: JournalConfig,
    aggregator: InsightAggregator,
    /// In-memory changes the slot has not seen yet
    dirty: bool,
}

impl MemoryStore {
    /// Open a store on `slot` with default journal settings
    pub fn open(slot: impl StorageSlot + 'static) -> Self {
        Self::open_with(Box::new(slot), JournalConfig::default())
    }

    /// Open a store on `slot`, loading whatever it holds
    pub fn open_with(slot: Box<dyn StorageSlot>, config: JournalConfig) -> Self {
        let mut store = Self {
            slot,
            records: Vec::new(),
            ids: IdGenerator::default(),
            aggregator: InsightAggregator::new(config.clone()),
            config,
            dirty: false,
        };
        store.load();
        store
    }

    /// Replace the in-memory collection with the slot's contents.
    ///
    /// Never fails: an absent, unreadable or malformed slot yields an empty
    /// journal.
    pub fn load(&mut self) {
        self.records = self.read_slot();

        let (threshold, limit) = (
            self.config.summary_word_threshold,
            self.config.summary_char_limit,
        );
        for record in &mut self.records {
            record.refresh_derived(|text| summary::summarize_with(text, threshold, limit));
        }

        let max_id = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        self.ids = IdGenerator::starting_after(max_id);
        self.dirty = false;

        tracing::debug!(
            "Loaded {} memories from {}",
            self.records.len(),
            self.slot.describe()
        );
    }

    fn read_slot(&self) -> Vec<MemoryRecord> {
        let data = match self.slot.read() {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.slot.describe(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "Discarding unparsable journal in {}: {}",
                    self.slot.describe(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Write the full ordered collection to the slot
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.slot.write(&json)?;
        tracing::debug!(
            "Persisted {} memories to {}",
            self.records.len(),
            self.slot.describe()
        );
        Ok(())
    }

    /// Record a new memory at the front of the journal
    pub fn add(&mut self, draft: NewMemory) -> Result<MemoryRecord> {
        self.add_at(draft, Utc::now())
    }

    /// `add` with an explicit creation instant
    pub fn add_at(&mut self, draft: NewMemory, now: DateTime<Utc>) -> Result<MemoryRecord> {
        let content = draft.content.trim().to_string();
        if content.is_empty() {
            return Err(Error::Validation(
                "memory content must not be empty".to_string(),
            ));
        }

        let emotion = match draft.emotion {
            Some(chosen) if !chosen.is_neutral() => chosen,
            _ => emotion::classify(&content),
        };
        let ai_summary = summary::summarize_with(
            &content,
            self.config.summary_word_threshold,
            self.config.summary_char_limit,
        );

        let record = MemoryRecord::new(
            self.ids.next(now),
            content,
            emotion,
            normalize_tags(&draft.tags),
            ai_summary,
            now,
        );
        tracing::debug!("Adding memory {} ({})", record.id, record.emotion);

        self.records.insert(0, record.clone());
        self.commit()?;
        Ok(record)
    }

    /// Remove the memory with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            tracing::debug!("Deleted memory {}", id);
        }
        self.commit()?;
        Ok(removed)
    }

    /// Remove every memory, leaving an empty journal in the slot
    pub fn clear(&mut self) -> Result<()> {
        let removed = self.records.len();
        self.records.clear();
        self.commit()?;
        tracing::info!("Cleared {} memories", removed);
        Ok(())
    }

    /// Remove every memory and erase the slot itself
    pub fn purge(&mut self) -> Result<()> {
        self.records.clear();
        self.dirty = true;
        self.slot.clear()?;
        self.dirty = false;
        tracing::info!("Erased {}", self.slot.describe());
        Ok(())
    }

    /// Mark the collection changed and write it out
    fn commit(&mut self) -> Result<()> {
        self.dirty = true;
        self.persist()?;
        self.dirty = false;
        Ok(())
    }

    /// Whether a mutation has not reached the slot yet (its persist failed)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flush pending changes before the store goes away.
    ///
    /// A store that was only read never writes, so a journal that failed to
    /// parse on load is left untouched on disk.
    pub fn close(self) -> Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }

    /// All memories, newest first
    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&MemoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Memories matching a free-text query
    pub fn filter(&self, query: &str) -> Vec<&MemoryRecord> {
        search::filter(&self.records, query)
    }

    pub fn insights(&self, now: DateTime<Utc>) -> Vec<Insight> {
        self.aggregator.insights(&self.records, now)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> MemoryStats {
        self.aggregator.stats(&self.records, now)
    }

    pub fn aggregator(&self) -> &InsightAggregator {
        &self.aggregator
    }
}
