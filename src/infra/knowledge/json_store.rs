use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::knowledge::{KnowledgePersistence, KnowledgeSnapshot, LearningLog, StoreError};

/// JSON-file persistence. The snapshot and the learning log live in two
/// separate pretty-printed files:
///
/// ```text
/// knowledge_base.json   { "entries": { id: entry }, "topics": { topic: [id] }, "statistics": {..} }
/// learning_history.json { "records": [..], "success_count", "failure_count", "last_learned" }
/// ```
///
/// Writes go to a sibling `*.tmp` file that is renamed over the target, so a
/// failed save never leaves a half-written file behind.
pub struct JsonKnowledgeStore {
    snapshot_path: PathBuf,
    log_path: PathBuf,
}

impl JsonKnowledgeStore {
    pub fn new(snapshot_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            log_path: log_path.into(),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl KnowledgePersistence for JsonKnowledgeStore {
    fn load_snapshot(&self) -> KnowledgeSnapshot {
        read_or_default(&self.snapshot_path)
    }

    fn save_snapshot(&self, snapshot: &KnowledgeSnapshot) -> Result<(), StoreError> {
        write_atomically(&self.snapshot_path, snapshot)
    }

    fn load_log(&self) -> LearningLog {
        read_or_default(&self.log_path)
    }

    fn save_log(&self, log: &LearningLog) -> Result<(), StoreError> {
        write_atomically(&self.log_path, log)
    }
}

/// Reads `path` as JSON. Missing or unparsable files yield `T::default()`.
fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Data file not found, starting empty");
            return T::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to open data file, starting empty: {}", e);
            return T::default();
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Data file is not valid JSON, starting empty: {}", e);
            T::default()
        }
    }
}

fn write_atomically<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = write_json(&tmp, value)
        .and_then(|_| fs::rename(&tmp, path).map_err(StoreError::from));
    if result.is_err() {
        // Best effort; the target file is untouched either way.
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
