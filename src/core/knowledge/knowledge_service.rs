// The knowledge base: owns every learned entry and the topic index, answers
// similarity lookups and keeps the persistence adapter up to date.
//
// Single owner, no internal locking. Callers that share it across tasks must
// serialize access themselves.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use thiserror::Error;

use super::knowledge_models::{
    KnowledgeEntry, KnowledgeSettings, KnowledgeSnapshot, LearningLog, LearningRecord,
    SnapshotStatistics, Statistics, TopicIndex, SNAPSHOT_VERSION,
};
use super::knowledge_persistence::{KnowledgePersistence, StoreError};
use crate::core::text::normalizer::normalize;
use crate::core::text::{similarity, AnalysisRecord, Classifier};

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to persist knowledge: {0}")]
    Persistence(#[from] StoreError),
}

/// An entry returned by [`KnowledgeBase::lookup`] with its score.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeMatch<'a> {
    pub entry: &'a KnowledgeEntry,
    pub score: f64,
}

pub struct KnowledgeBase<P: KnowledgePersistence> {
    persistence: P,
    classifier: Classifier,
    settings: KnowledgeSettings,
    /// Insertion order. Entries are never removed, so positions are stable.
    entries: Vec<KnowledgeEntry>,
    positions: HashMap<String, usize>,
    topics: TopicIndex,
    log: LearningLog,
    next_sequence: u64,
}

impl<P: KnowledgePersistence> KnowledgeBase<P> {
    /// Builds a knowledge base and fills it from `persistence`.
    pub fn open(persistence: P, classifier: Classifier, settings: KnowledgeSettings) -> Self {
        let mut kb = Self {
            persistence,
            classifier,
            settings: settings.sanitized(),
            entries: Vec::new(),
            positions: HashMap::new(),
            topics: TopicIndex::new(),
            log: LearningLog::default(),
            next_sequence: 0,
        };
        kb.reload();
        kb
    }

    /// Replaces the in-memory state with whatever the adapter holds.
    pub fn reload(&mut self) {
        let snapshot = self.persistence.load_snapshot();
        let log = self.persistence.load_log();
        self.restore(snapshot, log);

        tracing::info!(
            entries = self.entries.len(),
            topics = self.topics.topic_count(),
            "Knowledge base loaded"
        );
    }

    fn restore(&mut self, snapshot: KnowledgeSnapshot, log: LearningLog) {
        let mut entries: Vec<KnowledgeEntry> = snapshot
            .entries
            .into_iter()
            .map(|(id, mut entry)| {
                if entry.id != id {
                    tracing::warn!(key = %id, id = %entry.id, "Entry id does not match its key, using the key");
                    entry.id = id;
                }
                entry.use_count = entry.use_count.max(1);
                entry
            })
            .collect();
        // Stable: entries sharing a sequence keep key order.
        entries.sort_by_key(|e| e.sequence);

        self.next_sequence = entries.iter().map(|e| e.sequence + 1).max().unwrap_or(0);
        self.positions = entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.id.clone(), pos))
            .collect();

        // Rebuild the index so that it only references live entries and every
        // entry is reachable through its topic.
        let mut topics = TopicIndex::new();
        let mut indexed = HashSet::new();
        let mut dropped = 0usize;
        for (topic, ids) in snapshot.topics.iter() {
            for id in ids {
                if self.positions.contains_key(id) && indexed.insert(id.clone()) {
                    topics.insert(topic, id);
                } else {
                    dropped += 1;
                }
            }
        }
        let mut appended = 0usize;
        for entry in &entries {
            if !indexed.contains(&entry.id) {
                topics.insert(&entry.topic, &entry.id);
                appended += 1;
            }
        }
        if dropped > 0 || appended > 0 {
            tracing::warn!(dropped, appended, "Repaired topic index from snapshot");
        }

        self.entries = entries;
        self.topics = topics;
        self.log = log;
    }

    pub fn analyze(&self, text: &str) -> AnalysisRecord {
        self.classifier.analyze(text)
    }

    pub fn learning_log(&self) -> &LearningLog {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }

    /// Stores a new (input, answer) pair and returns its id.
    ///
    /// The topic is detected from `input_text` when not supplied. The entry is
    /// always kept in memory; an error means only that auto-save failed, and
    /// a later [`save`](Self::save) can retry.
    pub fn learn(
        &mut self,
        input_text: &str,
        answer_text: &str,
        topic: Option<&str>,
    ) -> Result<String, KnowledgeError> {
        let topic = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => topic.to_string(),
            None => self.classifier.topic(input_text).as_str().to_string(),
        };
        let keywords = self.classifier.keywords(input_text);
        let (id, sequence) = self.allocate_id(&topic);
        let now = Utc::now();

        let entry = KnowledgeEntry {
            id: id.clone(),
            sequence,
            input_text: input_text.to_string(),
            answer_text: answer_text.to_string(),
            topic: topic.clone(),
            keywords,
            created_at: now,
            updated_at: now,
            use_count: 1,
            success_score: 0.0,
        };

        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push(entry);
        self.topics.insert(&topic, &id);
        self.log.record(LearningRecord::succeeded(&id));

        if self.settings.auto_save {
            if let Err(err) = self.save() {
                tracing::error!(entry_id = %id, "Failed to persist learned entry: {}", err);
                self.log.retract_last();
                self.log.record(LearningRecord::failed());
                return Err(err.into());
            }
        }

        tracing::info!(entry_id = %id, topic = %topic, "Learned new entry");
        Ok(id)
    }

    /// Takes the next sequence number and turns it into an unused id.
    fn allocate_id(&mut self, topic: &str) -> (String, u64) {
        loop {
            let sequence = self.next_sequence;
            self.next_sequence += 1;
            let id = format!("{}_{}", topic, sequence);
            if !self.positions.contains_key(&id) {
                return (id, sequence);
            }
        }
    }

    /// Entries whose input scores at least the similarity threshold against
    /// `query`, best first. Equal scores keep insertion order.
    pub fn lookup(&self, query: &str, top_k: usize) -> Vec<KnowledgeMatch<'_>> {
        if top_k == 0 {
            return Vec::new();
        }

        let query = normalize(query);
        let mut matches: Vec<KnowledgeMatch<'_>> = self
            .entries
            .iter()
            .map(|entry| KnowledgeMatch {
                entry,
                score: similarity::ratio(&query, &normalize(&entry.input_text)),
            })
            .filter(|m| m.score >= self.settings.similarity_threshold)
            .collect();

        // sort_by is stable, so ties stay in insertion order
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);

        tracing::debug!(
            query = %query,
            matches = matches.len(),
            best = matches.first().map(|m| m.score),
            "Knowledge lookup"
        );
        matches
    }

    /// The stored answer for the closest entry, if it is close enough to reuse
    /// verbatim. Bumps that entry's use count.
    pub fn best_answer(&mut self, query: &str) -> Option<String> {
        let (id, score) = {
            let best = self.lookup(query, 1).into_iter().next()?;
            (best.entry.id.clone(), best.score)
        };
        if score <= self.settings.reuse_threshold {
            return None;
        }

        let pos = *self.positions.get(&id)?;
        let entry = &mut self.entries[pos];
        entry.use_count = entry.use_count.saturating_add(1);
        entry.updated_at = Utc::now();

        tracing::debug!(entry_id = %id, score, use_count = entry.use_count, "Reusing stored answer");
        Some(entry.answer_text.clone())
    }

    /// Up to `limit` entries filed under `topic`, oldest first.
    pub fn by_topic(&self, topic: &str, limit: usize) -> Vec<&KnowledgeEntry> {
        self.topics
            .ids(topic)
            .iter()
            .filter_map(|id| self.entry(id))
            .take(limit)
            .collect()
    }

    /// Replaces the answer of an existing entry. `Ok(false)` for unknown ids.
    ///
    /// Like [`learn`](Self::learn), the change stays in memory when auto-save
    /// fails and the error is returned.
    pub fn update_answer(
        &mut self,
        entry_id: &str,
        new_answer: &str,
    ) -> Result<bool, KnowledgeError> {
        let Some(&pos) = self.positions.get(entry_id) else {
            return Ok(false);
        };

        let entry = &mut self.entries[pos];
        entry.answer_text = new_answer.to_string();
        entry.updated_at = Utc::now();

        if self.settings.auto_save {
            if let Err(err) = self.save() {
                tracing::error!(entry_id, "Failed to persist updated answer: {}", err);
                return Err(err.into());
            }
        }
        Ok(true)
    }

    pub fn stats(&self) -> Statistics {
        let successful = self.log.success_count;
        let failed = self.log.failure_count;
        let attempts = successful + failed;

        Statistics {
            total_entries: self.entries.len(),
            topic_count: self.topics.topic_count(),
            successful_learnings: successful,
            failed_learnings: failed,
            success_rate: if attempts > 0 {
                successful as f64 / attempts as f64 * 100.0
            } else {
                0.0
            },
            last_learned: self.log.last_learned,
        }
    }

    pub fn snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            entries: self
                .entries
                .iter()
                .map(|e| (e.id.clone(), e.clone()))
                .collect(),
            topics: self.topics.clone(),
            statistics: SnapshotStatistics {
                total_entries: self.entries.len(),
                last_updated: Some(Utc::now()),
                version: SNAPSHOT_VERSION.to_string(),
            },
        }
    }

    /// Writes the snapshot and the learning log. Both are attempted; the first
    /// error is returned.
    pub fn save(&self) -> Result<(), StoreError> {
        let snapshot_result = self.persistence.save_snapshot(&self.snapshot());
        let log_result = self.persistence.save_log(&self.log);
        snapshot_result.and(log_result)
    }
}
