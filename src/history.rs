use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Summary of one completed attempt.
///
/// The serialized field names are the durable storage contract: history
/// files written by any implementation of this test carry exactly these
/// keys, with `date` an ISO-8601 timestamp string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_chars: u32,
    pub incorrect_chars: u32,
    /// Seconds of the time limit actually spent
    pub time_taken: u32,
    pub date: DateTime<Utc>,
}

/// Append-only log of completed attempts
pub trait HistoryStore {
    /// All recorded attempts in chronological order, oldest first.
    /// Consumers wanting newest-first reverse the returned sequence.
    fn read_all(&self) -> Vec<Record>;
    fn append(&self, record: &Record) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: default_history_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// History lives in the XDG state directory when HOME is known, with the
/// platform data dir as a fallback
fn default_history_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/tappa/history.json");
    }
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tappa") {
        return proj_dirs.data_local_dir().join("history.json");
    }
    PathBuf::from("tappa_history.json")
}

impl HistoryStore for FileHistoryStore {
    fn read_all(&self) -> Vec<Record> {
        // An absent or unparsable file reads as an empty history; corrupt
        // local data must never propagate a fault into presentation.
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(records) = serde_json::from_slice::<Vec<Record>>(&bytes) {
                return records;
            }
        }
        Vec::new()
    }

    fn append(&self, record: &Record) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut records = self.read_all();
        records.push(record.clone());
        let data = serde_json::to_vec_pretty(&records)?;

        // Stage next to the target and rename so a reader never observes a
        // partially-written history.
        let staged = self.path.with_extension("json.tmp");
        fs::write(&staged, data)?;
        fs::rename(&staged, &self.path)
    }
}
