//! Host boundary types
//!
//! Host payloads are loosely typed (`source` may be a string or a list,
//! `type` a number or a label). They are decoded here into one canonical
//! shape so nothing past this module sees the ambiguity.

use serde::{Deserialize, Deserializer, Serialize};

use super::variant::{LinkTypeVariant, RawTag};

/// Primitive link created for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLinkKind {
    /// Symbolic link to a file
    File,
    /// Symbolic link to a directory
    Dir,
    Hard,
}

impl FileLinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::Hard => "hard",
        }
    }
}

impl std::fmt::Display for FileLinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FileLinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "file" | "文件" => Ok(Self::File),
            "1" | "dir" | "directory" | "文件夹" => Ok(Self::Dir),
            "2" | "hard" | "硬链接" => Ok(Self::Hard),
            _ => Err(format!("Invalid file link kind: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for FileLinkKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match RawTag::deserialize(deserializer)? {
            RawTag::Number(n) => n.to_string(),
            RawTag::Text(s) => s,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One link created on disk as part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFile {
    pub id: u64,
    #[serde(rename = "type", alias = "type_")]
    pub kind: FileLinkKind,
    pub source: String,
    pub target: String,
}

/// `{source, target}` pair shown when a record is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkChild {
    pub source: String,
    pub target: String,
}

impl From<&LinkFile> for LinkChild {
    fn from(file: &LinkFile) -> Self {
        Self {
            source: file.source.clone(),
            target: file.target.clone(),
        }
    }
}

/// A persisted link as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    /// Saved name (`lname` at creation time)
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "one_or_many")]
    pub source: Vec<String>,
    pub target: String,
    #[serde(rename = "type", alias = "type_")]
    pub link_type: LinkTypeVariant,
    pub time: String,
    #[serde(default)]
    pub files: Vec<LinkFile>,
    #[serde(default, rename = "filesId", alias = "files_id")]
    pub files_id: String,
}

impl LinkRecord {
    /// Same record without its file breakdown
    pub fn summary(&self) -> Self {
        Self {
            files: Vec::new(),
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    OneOrMany::deserialize(deserializer).map(Vec::from)
}

/// Payload of the host `link` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(deserialize_with = "one_or_many")]
    pub source: Vec<String>,
    pub target: String,
    pub t: LinkTypeVariant,
    /// Custom name for the created link, only for single-source variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub lname: String,
}

/// Expansion of a record into its files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBreakdown {
    /// The record itself, only when requested with `all`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<LinkRecord>,
    #[serde(default)]
    pub files: Vec<LinkFile>,
}

/// Options handed to the path dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogOptions {
    pub directory: bool,
    pub multiple: bool,
}

/// What a path dialog answers with when the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DialogSelection {
    Single(String),
    Multiple(Vec<String>),
}

impl DialogSelection {
    pub fn into_paths(self) -> Vec<String> {
        match self {
            Self::Single(path) => vec![path],
            Self::Multiple(paths) => paths,
        }
    }
}
