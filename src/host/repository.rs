//! Link record persistence
//!
//! Records live in a single JSON file mirrored by an in-memory cache.
//! Every mutation is applied to a copy, flushed to disk, and only then
//! made visible, so a failed write leaves both sides unchanged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::errors::{LinkerError, Result};
use crate::link::LinkRecord;
use crate::utils::generate_random_code;

/// Length of record ids
pub const RECORD_ID_LEN: usize = 6;
/// Length of the id grouping a record's files
pub const FILES_ID_LEN: usize = 16;

pub struct RecordRepository {
    file_path: PathBuf,
    cache: RwLock<Vec<LinkRecord>>,
}

impl RecordRepository {
    /// Open the record file, creating an empty one if it does not exist
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        let records = Self::load_from_file(&file_path)?;
        info!(
            "Record store ready at {} ({} record(s))",
            file_path.display(),
            records.len()
        );

        Ok(Self {
            file_path,
            cache: RwLock::new(records),
        })
    }

    fn load_from_file(path: &Path) -> Result<Vec<LinkRecord>> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => serde_json::from_str::<Vec<LinkRecord>>(&content).map_err(|e| {
                error!("Failed to parse record file {}: {}", path.display(), e);
                LinkerError::serialization(format!(
                    "Failed to parse record file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, "[]").map_err(|e| {
                    LinkerError::file_operation(format!(
                        "Failed to create record file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                info!("Created empty record file: {}", path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(LinkerError::file_operation(format!(
                "Failed to read record file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save_to_file(&self, records: &[LinkRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        // 先写临时文件再替换，避免写到一半的文件
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.file_path)?;
        debug!("Saved {} record(s) to {}", records.len(), self.file_path.display());
        Ok(())
    }

    fn commit<T>(&self, change: impl FnOnce(&mut Vec<LinkRecord>) -> Result<T>) -> Result<T> {
        let mut guard = self.cache.write();
        let mut next = guard.clone();
        let value = change(&mut next)?;
        self.save_to_file(&next)?;
        *guard = next;
        Ok(value)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// All records without their file breakdown
    pub fn load_all(&self) -> Vec<LinkRecord> {
        self.cache.read().iter().map(LinkRecord::summary).collect()
    }

    /// Look a record up by its id or its files id
    pub fn get(&self, id: &str) -> Option<LinkRecord> {
        self.cache
            .read()
            .iter()
            .find(|r| r.id == id || (!r.files_id.is_empty() && r.files_id == id))
            .cloned()
    }

    pub fn insert(&self, record: LinkRecord) -> Result<()> {
        self.commit(|records| {
            if records.iter().any(|r| r.id == record.id) {
                return Err(LinkerError::validation(format!(
                    "Record '{}' already exists",
                    record.id
                )));
            }
            records.push(record);
            Ok(())
        })
    }

    pub fn replace(&self, record: LinkRecord) -> Result<()> {
        self.commit(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id == record.id)
                .ok_or_else(|| LinkerError::not_found(format!("Record '{}' not found", record.id)))?;
            *slot = record;
            Ok(())
        })
    }

    /// Returns whether a record was removed
    pub fn remove(&self, id: &str) -> Result<bool> {
        self.commit(|records| {
            let before = records.len();
            records.retain(|r| r.id != id);
            Ok(records.len() != before)
        })
    }

    /// Fresh record id not used by any stored record
    pub fn new_record_id(&self) -> String {
        self.unique_id(RECORD_ID_LEN, |r, id| r.id == id)
    }

    /// Fresh files id not used by any stored record
    pub fn new_files_id(&self) -> String {
        self.unique_id(FILES_ID_LEN, |r, id| r.files_id == id)
    }

    fn unique_id(&self, len: usize, taken: impl Fn(&LinkRecord, &str) -> bool) -> String {
        let records = self.cache.read();
        loop {
            let candidate = generate_random_code(len);
            if !records.iter().any(|r| taken(r, &candidate)) {
                return candidate;
            }
        }
    }
}
