//! Link configuration: variant catalog, draft, boundary types and the store

pub mod draft;
pub mod models;
pub mod store;
pub mod variant;

pub use draft::{LinkConfiguration, ResetPolicy};
pub use models::{
    CreateLinkRequest, DialogOptions, DialogSelection, FileBreakdown, FileLinkKind, LinkChild,
    LinkFile, LinkRecord,
};
pub use store::LinkConfigStore;
pub use variant::{LinkTypeVariant, VARIANT_TABLE, VariantEntry, VariantTraits, catalog};
