//! 链接草稿状态
//!
//! The draft the user edits before submitting a link. Variant-derived
//! flags are never set directly; they are re-read from the variant table.

use serde::{Deserialize, Serialize};

use super::models::{CreateLinkRequest, LinkChild, LinkRecord};
use super::variant::LinkTypeVariant;

/// What happens to the draft after a successful creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Keep sources, target and names for repeated submission
    #[default]
    Keep,
    /// Return to a pristine draft of the current variant
    ResetOnSuccess,
}

impl ResetPolicy {
    pub fn from_reset_flag(reset_on_success: bool) -> Self {
        if reset_on_success {
            ResetPolicy::ResetOnSuccess
        } else {
            ResetPolicy::Keep
        }
    }
}

/// In-progress link configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfiguration {
    /// Assigned by the host; empty while drafting
    pub id: String,
    pub display_name: String,
    pub link_name: String,
    pub name_disabled: bool,
    pub source_paths: Vec<String>,
    pub source_is_directory: bool,
    pub allows_multiple_sources: bool,
    pub target_path: String,
    pub variant: LinkTypeVariant,
    pub created_at: String,
    /// Only filled for persisted records, see [`LinkConfiguration::from_record`]
    pub children: Vec<LinkChild>,
}

impl Default for LinkConfiguration {
    fn default() -> Self {
        Self::for_variant(LinkTypeVariant::default())
    }
}

impl LinkConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pristine draft for a given variant
    pub fn for_variant(variant: LinkTypeVariant) -> Self {
        let mut draft = Self {
            id: String::new(),
            display_name: String::new(),
            link_name: String::new(),
            name_disabled: false,
            source_paths: Vec::new(),
            source_is_directory: false,
            allows_multiple_sources: false,
            target_path: String::new(),
            variant,
            created_at: String::new(),
            children: Vec::new(),
        };
        draft.apply_variant(variant);
        draft
    }

    /// Switch variant: clears sources and re-derives the flags.
    ///
    /// Total and idempotent; there is no rejection path.
    pub fn apply_variant(&mut self, variant: LinkTypeVariant) {
        let traits = variant.traits();
        self.variant = variant;
        self.source_paths.clear();
        self.name_disabled = traits.name_disabled();
        self.source_is_directory = traits.source_is_directory;
        self.allows_multiple_sources = traits.allows_multiple_sources;
    }

    /// Drop everything the user entered, keeping the current variant
    pub fn reset(&mut self) {
        *self = Self::for_variant(self.variant);
    }

    /// Name sent to the host, if any.
    ///
    /// None when name entry is disabled or the name is blank, so a
    /// multi-source request never carries a single custom name.
    pub fn effective_name(&self) -> Option<String> {
        if self.name_disabled || self.display_name.trim().is_empty() {
            None
        } else {
            Some(self.display_name.clone())
        }
    }

    pub fn to_request(&self) -> CreateLinkRequest {
        CreateLinkRequest {
            source: self.source_paths.clone(),
            target: self.target_path.clone(),
            t: self.variant,
            name: self.effective_name(),
            lname: self.link_name.clone(),
        }
    }

    /// Read-only view of a persisted record, with its children expanded
    pub fn from_record(record: &LinkRecord) -> Self {
        let mut view = Self::for_variant(record.link_type);
        view.id = record.id.clone();
        view.link_name = record.name.clone();
        view.source_paths = record.source.clone();
        view.target_path = record.target.clone();
        view.created_at = record.time.clone();
        view.children = record.files.iter().map(LinkChild::from).collect();
        view
    }
}
