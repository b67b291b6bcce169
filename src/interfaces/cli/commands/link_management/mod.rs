//! Link management commands

mod add;
mod helpers;
mod list;
mod remove;

pub use add::add_link;
pub use list::{list_files, list_links, list_types};
pub use remove::remove_links;
