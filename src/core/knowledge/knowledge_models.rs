use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel entry id recorded when a learning attempt fails.
pub const FAILED_ENTRY_ID: &str = "error";

/// Version tag written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// One learned (input, answer) pair.
///
/// `input_text` and `answer_text` are stored exactly as learned; normalization
/// happens at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    /// Global insertion number. Restores ordering after a reload.
    #[serde(default)]
    pub sequence: u64,
    pub input_text: String,
    pub answer_text: String,
    pub topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_use_count")]
    pub use_count: u64,
    /// Feedback score. Persisted, not used for ranking.
    #[serde(default)]
    pub success_score: f64,
}

fn default_use_count() -> u64 {
    1
}

/// Topic tag -> entry ids in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicIndex(BTreeMap<String, Vec<String>>);

impl TopicIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: &str, id: &str) {
        self.0
            .entry(topic.to_string())
            .or_default()
            .push(id.to_string());
    }

    /// Ids filed under `topic`, empty if the topic is unknown.
    pub fn ids(&self, topic: &str) -> &[String] {
        self.0.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn topic_count(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

/// Header written alongside the snapshot. Recomputed on save, ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStatistics {
    #[serde(default)]
    pub total_entries: usize,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl Default for SnapshotStatistics {
    fn default() -> Self {
        Self {
            total_entries: 0,
            last_updated: None,
            version: default_version(),
        }
    }
}

/// Serialized form of the knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    #[serde(default)]
    pub entries: BTreeMap<String, KnowledgeEntry>,
    #[serde(default)]
    pub topics: TopicIndex,
    #[serde(default)]
    pub statistics: SnapshotStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningOperation {
    NewKnowledge,
}

/// One append-only audit line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub timestamp: DateTime<Utc>,
    pub operation: LearningOperation,
    /// The learned entry, or [`FAILED_ENTRY_ID`] for a failed attempt.
    pub entry_id: String,
    pub success: bool,
}

impl LearningRecord {
    pub fn succeeded(entry_id: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: LearningOperation::NewKnowledge,
            entry_id: entry_id.to_string(),
            success: true,
        }
    }

    pub fn failed() -> Self {
        Self {
            timestamp: Utc::now(),
            operation: LearningOperation::NewKnowledge,
            entry_id: FAILED_ENTRY_ID.to_string(),
            success: false,
        }
    }
}

/// Learning history. Only feeds statistics; never drives behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningLog {
    #[serde(default)]
    pub records: Vec<LearningRecord>,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failure_count: u64,
    #[serde(default)]
    pub last_learned: Option<DateTime<Utc>>,
}

impl LearningLog {
    pub fn record(&mut self, record: LearningRecord) {
        if record.success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.last_learned = Some(record.timestamp);
        self.records.push(record);
    }

    /// Removes the newest record and its contribution to the counters.
    pub(crate) fn retract_last(&mut self) -> Option<LearningRecord> {
        let record = self.records.pop()?;
        if record.success {
            self.success_count = self.success_count.saturating_sub(1);
        } else {
            self.failure_count = self.failure_count.saturating_sub(1);
        }
        Some(record)
    }
}

/// Derived view over the entry set and the learning log.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_entries: usize,
    pub topic_count: usize,
    pub successful_learnings: u64,
    pub failed_learnings: u64,
    /// Percentage in `[0, 100]`; 0 when nothing has been learned yet.
    pub success_rate: f64,
    pub last_learned: Option<DateTime<Utc>>,
}

/// Retrieval and persistence tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// Minimum score for an entry to show up in `lookup`.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// `best_answer` reuses an entry only when its score is strictly above this.
    #[serde(default = "default_reuse_threshold")]
    pub reuse_threshold: f64,
    /// Persist after every `learn` and `update_answer`.
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_reuse_threshold() -> f64 {
    0.8
}

fn default_auto_save() -> bool {
    true
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            reuse_threshold: default_reuse_threshold(),
            auto_save: default_auto_save(),
        }
    }
}

impl KnowledgeSettings {
    /// Clamps both thresholds into `[0, 1]`. NaN falls back to the default.
    pub fn sanitized(mut self) -> Self {
        self.similarity_threshold =
            clamp_unit(self.similarity_threshold, default_similarity_threshold());
        self.reuse_threshold = clamp_unit(self.reuse_threshold, default_reuse_threshold());
        self
    }
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}
