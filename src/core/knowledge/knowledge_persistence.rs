use super::knowledge_models::{KnowledgeSnapshot, LearningLog};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable home for the knowledge snapshot and the learning log.
///
/// Loads never fail: a missing or unreadable resource yields the default
/// (empty) value and is logged by the implementation. Saves report failure and
/// must not touch the caller's in-memory state, so a failed save can simply be
/// retried.
pub trait KnowledgePersistence {
    fn load_snapshot(&self) -> KnowledgeSnapshot;
    fn save_snapshot(&self, snapshot: &KnowledgeSnapshot) -> Result<(), StoreError>;
    fn load_log(&self) -> LearningLog;
    fn save_log(&self, log: &LearningLog) -> Result<(), StoreError>;
}

// Lets the composition root pick a backend at runtime.
impl KnowledgePersistence for Box<dyn KnowledgePersistence> {
    fn load_snapshot(&self) -> KnowledgeSnapshot {
        (**self).load_snapshot()
    }

    fn save_snapshot(&self, snapshot: &KnowledgeSnapshot) -> Result<(), StoreError> {
        (**self).save_snapshot(snapshot)
    }

    fn load_log(&self) -> LearningLog {
        (**self).load_log()
    }

    fn save_log(&self, log: &LearningLog) -> Result<(), StoreError> {
        (**self).save_log(log)
    }
}
