// Start-up configuration.
//
// Layers, later wins: built-in defaults, the JSON settings file, the JSON
// language rules file, then environment variables. Nothing here is fatal; a
// missing or broken file is logged and skipped.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::knowledge::KnowledgeSettings;
use crate::core::text::LanguageRules;

const DEFAULT_SETTINGS_FILE: &str = "config/settings.json";
const DEFAULT_RULES_FILE: &str = "config/language_rules.json";
const DEFAULT_DATA_DIR: &str = "data";
const KNOWLEDGE_FILE_NAME: &str = "knowledge_base.json";
const HISTORY_FILE_NAME: &str = "learning_history.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Two JSON files under the data directory.
    Json,
    /// Nothing is written; the session starts empty.
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub knowledge_path: PathBuf,
    pub history_path: PathBuf,
}

impl StorageSettings {
    fn in_dir(dir: &Path) -> Self {
        Self {
            backend: StorageBackend::Json,
            knowledge_path: dir.join(KNOWLEDGE_FILE_NAME),
            history_path: dir.join(HISTORY_FILE_NAME),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_DATA_DIR))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantConfig {
    pub knowledge: KnowledgeSettings,
    pub rules: LanguageRules,
    pub storage: StorageSettings,
}

/// Shape of `settings.json`.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(flatten)]
    knowledge: KnowledgeSettings,
    #[serde(default)]
    data_dir: Option<PathBuf>,
}

impl AssistantConfig {
    /// Loads configuration from the process environment. Call after `dotenv`.
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Loads configuration, reading variables through `var`.
    pub fn from_source(var: impl Fn(&str) -> Option<String>) -> Self {
        let settings_path = var("ASSISTANT_SETTINGS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let rules_path = var("ASSISTANT_RULES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_FILE));

        let settings: SettingsFile = read_json_file(&settings_path).unwrap_or_default();
        let rules: LanguageRules = read_json_file(&rules_path).unwrap_or_default();

        let mut knowledge = settings.knowledge;
        let data_dir = var("ASSISTANT_DATA_DIR")
            .map(PathBuf::from)
            .or(settings.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let mut storage = StorageSettings::in_dir(&data_dir);

        if let Some(value) = parse_var::<f64>(&var, "ASSISTANT_SIMILARITY_THRESHOLD") {
            knowledge.similarity_threshold = value;
        }
        if let Some(value) = parse_var::<f64>(&var, "ASSISTANT_REUSE_THRESHOLD") {
            knowledge.reuse_threshold = value;
        }
        if let Some(value) = parse_var::<bool>(&var, "ASSISTANT_AUTO_SAVE") {
            knowledge.auto_save = value;
        }
        match var("ASSISTANT_STORAGE").as_deref().map(str::trim) {
            Some("memory") => storage.backend = StorageBackend::Memory,
            Some("json") | None => {}
            Some(other) => {
                tracing::warn!("Unknown ASSISTANT_STORAGE '{}', using json", other);
            }
        }

        Self {
            knowledge: knowledge.sanitized(),
            rules,
            storage,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Config file unavailable, using defaults: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Config file is malformed, using defaults: {}", e);
            None
        }
    }
}
