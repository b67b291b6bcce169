//! Host command boundary
//!
//! The store never touches the filesystem or the record database itself.
//! It talks to a [`LinkHost`] for persistence and linking and to a
//! [`PathDialog`] for path selection.

use async_trait::async_trait;

use crate::errors::Result;
use crate::link::{CreateLinkRequest, DialogOptions, DialogSelection, FileBreakdown, LinkRecord};

pub mod dialog;
pub mod engine;
pub mod local;
pub mod repository;

pub use dialog::PresetDialog;
pub use engine::{LinkOptions, LinkOutcome};
pub use local::LocalHost;
pub use repository::RecordRepository;

#[async_trait]
pub trait LinkHost: Send + Sync {
    /// Create the links described by the request and persist a record
    async fn link(&self, request: CreateLinkRequest) -> Result<()>;

    /// All persisted records
    async fn read_links(&self) -> Result<Vec<LinkRecord>>;

    /// File breakdown of one record; `all` also returns the record itself
    async fn read_link_files(&self, id: &str, all: bool) -> Result<FileBreakdown>;

    /// Remove the records and the links they created
    async fn remove_links(&self, records: Vec<LinkRecord>) -> Result<()>;

    async fn backend_name(&self) -> String;
}

#[async_trait]
pub trait PathDialog: Send + Sync {
    /// `Ok(None)` means the user cancelled
    async fn open(&self, options: DialogOptions) -> Result<Option<DialogSelection>>;
}
