pub mod knowledge_models;
pub mod knowledge_persistence;
pub mod knowledge_service;

pub use knowledge_models::{
    KnowledgeEntry, KnowledgeSettings, KnowledgeSnapshot, LearningLog, LearningOperation,
    LearningRecord, SnapshotStatistics, Statistics, TopicIndex, FAILED_ENTRY_ID,
};
pub use knowledge_persistence::{KnowledgePersistence, StoreError};
pub use knowledge_service::{KnowledgeBase, KnowledgeError, KnowledgeMatch};
