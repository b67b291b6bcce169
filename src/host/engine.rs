//! Filesystem link engine
//!
//! Turns a [`CreateLinkRequest`] into links on disk. Each attempted entry is
//! recorded as a [`LinkFile`]; individual failures are collected rather
//! than aborting the whole request.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{LinkerError, Result};
use crate::link::{CreateLinkRequest, FileLinkKind, LinkFile, LinkTypeVariant};
use crate::utils::random_numeric_id;

/// Length of the numeric id given to each linked entry
const FILE_ID_DIGITS: u32 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Link symlinks found while walking a source directory instead of
    /// skipping them
    pub include_symlinks: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub linked: Vec<LinkFile>,
    pub failed: Vec<LinkFile>,
}

impl LinkOutcome {
    pub fn attempted(&self) -> usize {
        self.linked.len() + self.failed.len()
    }

    /// Something was attempted and nothing succeeded
    pub fn is_total_failure(&self) -> bool {
        self.linked.is_empty() && !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryType {
    File,
    Dir,
}

/// Create every link the request describes.
pub fn run(request: &CreateLinkRequest, options: LinkOptions) -> Result<LinkOutcome> {
    let first = request
        .source
        .first()
        .map(Path::new)
        .ok_or_else(|| LinkerError::validation("No source selected"))?;
    if request.target.trim().is_empty() {
        return Err(LinkerError::validation("No target directory selected"));
    }
    let target_root = Path::new(&request.target);
    let mut outcome = LinkOutcome::default();

    use LinkTypeVariant::*;
    match (request.t, request.t.link_kind()) {
        (File | Dir | Hard, Some(kind)) => {
            let name = match request.name.as_deref() {
                Some(name) => custom_name(name)?,
                None => file_name(first)?,
            };
            attempt(&mut outcome, kind, first, &target_root.join(name));
        }
        (Files | Dirs | Hards, Some(kind)) => {
            // 先校验所有文件名，避免只建立一部分链接
            let named = request
                .source
                .iter()
                .map(|s| file_name(Path::new(s)).map(|name| (Path::new(s), name)))
                .collect::<Result<Vec<_>>>()?;
            for (source, name) in named {
                attempt(&mut outcome, kind, source, &target_root.join(name));
            }
        }
        (DirAllFiles | HardsDirAllFiles, Some(kind)) => {
            link_tree(first, target_root, kind, options, &mut outcome)?;
        }
        (DirSurface, _) => link_surface(first, target_root, options, &mut outcome)?,
        (variant, None) => {
            return Err(LinkerError::validation(format!(
                "No link kind for {:?}",
                variant
            )));
        }
    }

    debug!(
        "Link request finished: {} linked, {} failed",
        outcome.linked.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

fn file_name(path: &Path) -> Result<OsString> {
    path.file_name()
        .map(OsString::from)
        .ok_or_else(|| LinkerError::validation(format!("Cannot determine file name of '{}'", path.display())))
}

/// A custom link name must stay inside the target directory
fn custom_name(name: &str) -> Result<OsString> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => Ok(part.to_os_string()),
        _ => Err(LinkerError::validation(format!(
            "Invalid link name '{}': must be a plain file name",
            name
        ))),
    }
}

fn require_dir(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(LinkerError::validation(format!(
            "Source is not a directory: {}",
            root.display()
        )))
    }
}

/// Every file under `root`, recreating the directory layout under `target_root`.
fn link_tree(
    root: &Path,
    target_root: &Path,
    kind: FileLinkKind,
    options: LinkOptions,
    outcome: &mut LinkOutcome,
) -> Result<()> {
    require_dir(root)?;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| LinkerError::file_operation(e.to_string()))?;
        let destination = target_root.join(relative);

        match classify(&entry, options) {
            Some(EntryType::File) => attempt(outcome, kind, entry.path(), &destination),
            Some(EntryType::Dir) => {
                if let Err(e) = fs::create_dir_all(&destination) {
                    warn!("Failed to create directory {}: {}", destination.display(), e);
                }
            }
            None => {}
        }
    }
    Ok(())
}

/// First level under `root`: files as file links, directories as directory links.
fn link_surface(
    root: &Path,
    target_root: &Path,
    options: LinkOptions,
    outcome: &mut LinkOutcome,
) -> Result<()> {
    require_dir(root)?;

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let destination = target_root.join(entry.file_name());

        match classify(&entry, options) {
            Some(EntryType::File) => attempt(outcome, FileLinkKind::File, entry.path(), &destination),
            Some(EntryType::Dir) => attempt(outcome, FileLinkKind::Dir, entry.path(), &destination),
            None => {}
        }
    }
    Ok(())
}

fn classify(entry: &DirEntry, options: LinkOptions) -> Option<EntryType> {
    let file_type = entry.file_type();
    if file_type.is_symlink() {
        if !options.include_symlinks {
            return None;
        }
        // 跟随链接判断指向的是文件还是目录
        return Some(if entry.path().is_dir() {
            EntryType::Dir
        } else {
            EntryType::File
        });
    }

    if file_type.is_dir() {
        Some(EntryType::Dir)
    } else if file_type.is_file() {
        Some(EntryType::File)
    } else {
        None
    }
}

fn attempt(outcome: &mut LinkOutcome, kind: FileLinkKind, source: &Path, destination: &Path) {
    let file = LinkFile {
        id: random_numeric_id(FILE_ID_DIGITS),
        kind,
        source: source.to_string_lossy().into_owned(),
        target: destination.to_string_lossy().into_owned(),
    };

    match create_link(kind, source, destination) {
        Ok(()) => outcome.linked.push(file),
        Err(e) => {
            warn!(
                "Failed to create {} link {} -> {}: {}",
                kind,
                file.source,
                file.target,
                e
            );
            outcome.failed.push(file);
        }
    }
}

fn create_link(kind: FileLinkKind, original: &Path, link: &Path) -> io::Result<()> {
    match kind {
        FileLinkKind::File => symlink_file(original, link),
        FileLinkKind::Dir => symlink_dir(original, link),
        FileLinkKind::Hard => fs::hard_link(original, link),
    }
}

#[cfg(unix)]
fn symlink_file(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(unix)]
fn symlink_dir(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink_file(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

#[cfg(windows)]
fn symlink_dir(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(original, link)
}

/// Delete the link a [`LinkFile`] points at.
///
/// Missing targets count as removed. Real directories are only removed
/// when empty.
pub fn remove_link(file: &LinkFile) -> io::Result<()> {
    let path = Path::new(&file.target);
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        remove_symlink(path, file.kind)
    } else if file_type.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn remove_symlink(path: &Path, _kind: FileLinkKind) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(windows)]
fn remove_symlink(path: &Path, kind: FileLinkKind) -> io::Result<()> {
    if kind == FileLinkKind::Dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}
