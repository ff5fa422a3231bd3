//! On-disk storage of conversation records and their audit logs
//!
//! Layout inside the storage directory:
//!
//! ```text
//! conversations/
//! ├── conversation_2024-03-09_14-05-07.json
//! └── log_2024-03-09_14-05-07.txt
//! ```

use chrono::Local;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

use super::identity::RecordId;
use super::record::ConversationRecord;
use crate::utils::single_line;
use crate::{Error, Result};

const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of removing one file of a record/log pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// Nothing was there to remove
    Absent,
    Failed(String),
}

impl Removal {
    pub fn is_failed(&self) -> bool {
        matches!(self, Removal::Failed(_))
    }
}

impl fmt::Display for Removal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Removal::Removed => f.write_str("removed"),
            Removal::Absent => f.write_str("absent"),
            Removal::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// What happened to each half of a deleted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub record: Removal,
    pub log: Removal,
}

impl DeleteReport {
    /// Neither half failed
    pub fn is_complete(&self) -> bool {
        !self.record.is_failed() && !self.log.is_failed()
    }
}

impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}, audit log {}", self.record, self.log)
    }
}

/// File-backed store for conversation records
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, id: &RecordId) -> PathBuf {
        self.dir.join(id.record_file_name())
    }

    pub fn log_path(&self, id: &RecordId) -> PathBuf {
        self.dir.join(id.log_file_name())
    }

    pub fn exists(&self, id: &RecordId) -> bool {
        self.record_path(id).is_file()
    }

    /// All stored identities, most recently modified first.
    ///
    /// A missing storage directory yields an empty list.
    pub fn list_identities(&self) -> Result<Vec<RecordId>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut found: Vec<(SystemTime, RecordId)> = Vec::new();
        for entry in entries.flatten() {
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(RecordId::from_record_file_name)
            else {
                continue;
            };
            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {}: cannot stat: {}", entry.path().display(), e);
                    continue;
                }
            };
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            found.push((modified, id));
        }

        found.sort_by(|a, b| b.cmp(a));
        Ok(found.into_iter().map(|(_, id)| id).collect())
    }

    /// Read and parse a stored record
    pub fn read(&self, id: &RecordId) -> Result<ConversationRecord> {
        let path = self.record_path(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(id.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(Error::Corrupt {
                    id: id.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| Error::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Replace the stored record.
    ///
    /// The new content goes to a temporary file in the same directory which is
    /// then renamed over the record, so a crash leaves the previous version intact.
    pub fn write(&self, id: &RecordId, record: &ConversationRecord) -> Result<()> {
        let path = self.record_path(id);
        let tmp_path = self.dir.join(format!(".{}.tmp", id.record_file_name()));

        let result = self.write_atomically(record, &tmp_path, &path);
        if let Err(e) = &result {
            let _ = fs::remove_file(&tmp_path);
            warn!("Failed to persist {}: {}", path.display(), e);
        }
        result.map_err(|e| Error::StorageWriteFailed(format!("{}: {}", path.display(), e)))
    }

    fn write_atomically(
        &self,
        record: &ConversationRecord,
        tmp_path: &Path,
        path: &Path,
    ) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;

        let mut tmp_file = File::create(tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(tmp_path, path)?;
        debug!("Persisted {} ({} turns)", path.display(), record.len());
        Ok(())
    }

    /// Remove a record together with its audit log.
    ///
    /// Both removals are always attempted. If either fails the report is
    /// returned inside [`Error::PartialDelete`].
    pub fn delete(&self, id: &RecordId) -> Result<DeleteReport> {
        let record_path = self.record_path(id);
        let log_path = self.log_path(id);
        if !record_path.exists() && !log_path.exists() {
            return Err(Error::NotFound(id.to_string()));
        }

        let report = DeleteReport {
            record: remove_file(&record_path),
            log: remove_file(&log_path),
        };
        debug!("Delete {}: {}", id, report);

        if report.is_complete() {
            Ok(report)
        } else {
            Err(Error::PartialDelete(report))
        }
    }

    /// Append one timestamped line to the audit log.
    ///
    /// Failures are logged and swallowed; an audit line must never abort a turn.
    pub fn append_log(&self, id: &RecordId, line: &str) {
        if let Err(e) = self.try_append_log(id, line) {
            warn!("Audit log append for {} failed: {}", id, e);
        }
    }

    /// Append one timestamped line to the audit log, reporting failures
    pub fn try_append_log(&self, id: &RecordId, line: &str) -> Result<()> {
        let path = self.log_path(id);
        let append = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            let timestamp = Local::now().format(AUDIT_TIMESTAMP_FORMAT);
            writeln!(file, "[{}] {}", timestamp, single_line(line))
        };
        append().map_err(|e| Error::StorageWriteFailed(format!("{}: {}", path.display(), e)))
    }
}

fn remove_file(path: &Path) -> Removal {
    match fs::remove_file(path) {
        Ok(()) => Removal::Removed,
        Err(e) if e.kind() == ErrorKind::NotFound => Removal::Absent,
        Err(e) => Removal::Failed(e.to_string()),
    }
}
