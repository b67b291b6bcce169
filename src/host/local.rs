//! In-process host
//!
//! Implements the host commands directly on the local filesystem and a
//! JSON record file. Blocking filesystem work runs on tokio's blocking
//! pool.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::LinkHost;
use super::engine::{self, LinkOptions};
use super::repository::RecordRepository;
use crate::config::StaticConfig;
use crate::errors::{LinkerError, Result};
use crate::link::{CreateLinkRequest, FileBreakdown, LinkFile, LinkRecord};
use crate::utils::local_timestamp;

pub struct LocalHost {
    repository: Arc<RecordRepository>,
    options: LinkOptions,
}

impl LocalHost {
    pub fn new(repository: Arc<RecordRepository>, options: LinkOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// Build a host from the static configuration
    pub fn from_config(config: &StaticConfig) -> Result<Self> {
        let repository = RecordRepository::open(&config.storage.db_file)?;
        let options = LinkOptions {
            include_symlinks: config.linking.include_symlinks,
        };
        Ok(Self::new(Arc::new(repository), options))
    }

    pub fn repository(&self) -> &Arc<RecordRepository> {
        &self.repository
    }

    fn create_blocking(
        repository: &RecordRepository,
        request: CreateLinkRequest,
        options: LinkOptions,
    ) -> Result<()> {
        let outcome = engine::run(&request, options)?;

        if outcome.is_total_failure() {
            return Err(LinkerError::link_failed(format!(
                "None of the {} link(s) could be created in {}",
                outcome.attempted(),
                request.target
            )));
        }
        if !outcome.failed.is_empty() {
            warn!(
                "{} of {} link(s) failed and were not recorded",
                outcome.failed.len(),
                outcome.attempted()
            );
        }

        // 记录的源路径是第一个源所在的目录
        let source = request
            .source
            .first()
            .and_then(|first| Path::new(first).parent())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let record = LinkRecord {
            id: repository.new_record_id(),
            name: request.lname,
            source: vec![source],
            target: request.target,
            link_type: request.t,
            time: local_timestamp(),
            files: outcome.linked,
            files_id: repository.new_files_id(),
        };
        info!(
            "Recorded link {} ({:?}, {} file(s))",
            record.id,
            record.link_type,
            record.files.len()
        );
        repository.insert(record)
    }

    fn remove_blocking(repository: &RecordRepository, records: Vec<LinkRecord>) -> Result<()> {
        let mut leftovers: Vec<String> = Vec::new();

        for requested in records {
            let lookup = if requested.id.is_empty() {
                &requested.files_id
            } else {
                &requested.id
            };
            let Some(mut stored) = repository.get(lookup) else {
                warn!("Record {} not found, skipping", lookup);
                continue;
            };

            let failed: Vec<LinkFile> = stored
                .files
                .iter()
                .filter(|file| match engine::remove_link(file) {
                    Ok(()) => false,
                    Err(e) => {
                        warn!("Failed to remove link {}: {}", file.target, e);
                        true
                    }
                })
                .cloned()
                .collect();

            if failed.is_empty() {
                repository.remove(&stored.id)?;
                info!("Removed record {}", stored.id);
            } else {
                // 保留删除失败的条目，方便之后重试
                leftovers.extend(failed.iter().map(|f| f.target.clone()));
                stored.files = failed;
                repository.replace(stored)?;
            }
        }

        if leftovers.is_empty() {
            Ok(())
        } else {
            Err(LinkerError::file_operation(format!(
                "Could not remove {} link(s): {}",
                leftovers.len(),
                leftovers.join(", ")
            )))
        }
    }
}

#[async_trait]
impl LinkHost for LocalHost {
    async fn link(&self, request: CreateLinkRequest) -> Result<()> {
        let repository = Arc::clone(&self.repository);
        let options = self.options;
        tokio::task::spawn_blocking(move || Self::create_blocking(&repository, request, options))
            .await?
    }

    async fn read_links(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.repository.load_all())
    }

    async fn read_link_files(&self, id: &str, all: bool) -> Result<FileBreakdown> {
        let record = self
            .repository
            .get(id)
            .ok_or_else(|| LinkerError::not_found(format!("Link record '{}' not found", id)))?;

        Ok(FileBreakdown {
            record: all.then(|| record.summary()),
            files: record.files,
        })
    }

    async fn remove_links(&self, records: Vec<LinkRecord>) -> Result<()> {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || Self::remove_blocking(&repository, records)).await?
    }

    async fn backend_name(&self) -> String {
        format!("local ({})", self.repository.file_path().display())
    }
}
