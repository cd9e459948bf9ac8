// Implementations of the knowledge persistence port.

pub mod in_memory;
pub mod json_store;

pub use in_memory::InMemoryKnowledgeStore;
pub use json_store::JsonKnowledgeStore;
