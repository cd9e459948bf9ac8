pub mod classifier;
pub mod language_rules;
pub mod normalizer;
pub mod similarity;

pub use classifier::{AnalysisRecord, Classifier, Sentiment, Topic};
pub use language_rules::{LanguageRules, TopicKeywords};
pub use normalizer::{normalize, TextNormalizer};
