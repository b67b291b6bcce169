pub mod config_management;
pub mod link_management;

pub use link_management::{add_link, list_files, list_links, list_types, remove_links};
