//! Link configuration store
//!
//! Owns the draft and the listing cache and drives the create / list /
//! delete protocol against the host. Every method takes `&self` so one
//! store can be shared between concurrent UI tasks. Locks are never held
//! across an `.await`: overlapping calls are allowed and whichever settles
//! last wins.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::draft::{LinkConfiguration, ResetPolicy};
use super::models::{DialogOptions, FileBreakdown, LinkRecord};
use super::variant::{LinkTypeVariant, VariantEntry, catalog};
use crate::errors::Result;
use crate::host::{LinkHost, PathDialog};

pub struct LinkConfigStore {
    host: Arc<dyn LinkHost>,
    dialog: Arc<dyn PathDialog>,
    draft: RwLock<LinkConfiguration>,
    listing: ArcSwap<Vec<LinkRecord>>,
    reset_policy: ResetPolicy,
}

impl LinkConfigStore {
    pub fn new(host: Arc<dyn LinkHost>, dialog: Arc<dyn PathDialog>) -> Self {
        Self {
            host,
            dialog,
            draft: RwLock::new(LinkConfiguration::new()),
            listing: ArcSwap::from_pointee(Vec::new()),
            reset_policy: ResetPolicy::default(),
        }
    }

    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    pub fn host(&self) -> &Arc<dyn LinkHost> {
        &self.host
    }

    /// Variants offered to the user, in wire order
    pub fn catalog(&self) -> &'static [VariantEntry] {
        catalog()
    }

    /// Snapshot of the current draft
    pub fn draft(&self) -> LinkConfiguration {
        self.draft.read().clone()
    }

    pub fn select_variant(&self, variant: LinkTypeVariant) {
        debug!("Selecting link type: {:?}", variant);
        self.draft.write().apply_variant(variant);
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        self.draft.write().display_name = name.into();
    }

    pub fn set_link_name(&self, name: impl Into<String>) {
        self.draft.write().link_name = name.into();
    }

    pub fn set_target_path(&self, path: impl Into<String>) {
        self.draft.write().target_path = path.into();
    }

    pub fn set_source_paths(&self, paths: Vec<String>) {
        self.draft.write().source_paths = paths;
    }

    pub fn reset_draft(&self) {
        self.draft.write().reset();
    }

    /// Ask the dialog for sources using the current variant's flags.
    ///
    /// Returns whether the draft changed; a cancelled dialog leaves the
    /// sources untouched.
    pub async fn select_source(&self) -> Result<bool> {
        let options = {
            let draft = self.draft.read();
            DialogOptions {
                directory: draft.source_is_directory,
                multiple: draft.allows_multiple_sources,
            }
        };

        match self.dialog.open(options).await? {
            Some(selection) => {
                let paths = selection.into_paths();
                debug!("Selected {} source path(s)", paths.len());
                self.draft.write().source_paths = paths;
                Ok(true)
            }
            None => {
                debug!("Source selection cancelled");
                Ok(false)
            }
        }
    }

    /// Ask the dialog for a single target directory.
    pub async fn select_target(&self) -> Result<bool> {
        let options = DialogOptions {
            directory: true,
            multiple: false,
        };

        let target = self
            .dialog
            .open(options)
            .await?
            .and_then(|selection| selection.into_paths().into_iter().next());

        match target {
            Some(path) => {
                debug!("Selected target: {}", path);
                self.draft.write().target_path = path;
                Ok(true)
            }
            None => {
                debug!("Target selection cancelled");
                Ok(false)
            }
        }
    }

    /// Submit the draft to the host, then refresh the listing.
    ///
    /// The refresh runs exactly once whether or not the host call
    /// succeeded. A host failure is returned in preference to a refresh
    /// failure.
    pub async fn create_link(&self) -> Result<()> {
        let request = self.draft.read().to_request();
        info!(
            "Creating {:?} link: {} source(s) -> {}",
            request.t,
            request.source.len(),
            request.target
        );

        let outcome = self.host.link(request).await;
        match &outcome {
            Ok(()) => {
                if self.reset_policy == ResetPolicy::ResetOnSuccess {
                    self.draft.write().reset();
                }
            }
            Err(e) => warn!("Link creation failed: {}", e),
        }

        let refreshed = self.refresh_listing().await;
        settle("create", outcome, refreshed)
    }

    /// Replace the listing cache with the host's current records.
    ///
    /// Returns the number of records now cached. On failure the previous
    /// cache is kept as is.
    pub async fn refresh_listing(&self) -> Result<usize> {
        let records = self.host.read_links().await?;
        let count = records.len();
        self.listing.store(Arc::new(records));
        debug!("Listing refreshed: {} record(s)", count);
        Ok(count)
    }

    /// Current listing cache
    pub fn listing(&self) -> Arc<Vec<LinkRecord>> {
        self.listing.load_full()
    }

    /// File breakdown of a record, always fetched fresh from the host
    pub async fn fetch_children(&self, id: &str, include_all: bool) -> Result<FileBreakdown> {
        self.host.read_link_files(id, include_all).await
    }

    /// Remove records through the host, then refresh the listing.
    pub async fn delete_links(&self, records: &[LinkRecord]) -> Result<()> {
        info!("Removing {} link record(s)", records.len());

        let outcome = self.host.remove_links(records.to_vec()).await;
        if let Err(e) = &outcome {
            warn!("Link removal failed: {}", e);
        }

        let refreshed = self.refresh_listing().await;
        settle("remove", outcome, refreshed)
    }
}

fn settle(action: &str, outcome: Result<()>, refreshed: Result<usize>) -> Result<()> {
    match (outcome, refreshed) {
        (Err(e), Err(refresh_err)) => {
            warn!("Listing refresh after failed {} also failed: {}", action, refresh_err);
            Err(e)
        }
        (Err(e), Ok(_)) => Err(e),
        (Ok(()), Err(refresh_err)) => Err(refresh_err),
        (Ok(()), Ok(_)) => Ok(()),
    }
}
