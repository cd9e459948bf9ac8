// In-memory implementation of KnowledgePersistence.
//
// Nothing survives the process. Used for throwaway sessions and tests that
// want to inspect what the knowledge base wrote.

use std::cell::RefCell;

use crate::core::knowledge::{KnowledgePersistence, KnowledgeSnapshot, LearningLog, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryKnowledgeStore {
    snapshot: RefCell<KnowledgeSnapshot>,
    log: RefCell<LearningLog>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing data, as if it had been loaded from disk.
    pub fn with_data(snapshot: KnowledgeSnapshot, log: LearningLog) -> Self {
        Self {
            snapshot: RefCell::new(snapshot),
            log: RefCell::new(log),
        }
    }
}

impl KnowledgePersistence for InMemoryKnowledgeStore {
    fn load_snapshot(&self) -> KnowledgeSnapshot {
        self.snapshot.borrow().clone()
    }

    fn save_snapshot(&self, snapshot: &KnowledgeSnapshot) -> Result<(), StoreError> {
        *self.snapshot.borrow_mut() = snapshot.clone();
        Ok(())
    }

    fn load_log(&self) -> LearningLog {
        self.log.borrow().clone()
    }

    fn save_log(&self, log: &LearningLog) -> Result<(), StoreError> {
        *self.log.borrow_mut() = log.clone();
        Ok(())
    }
}
