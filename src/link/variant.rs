//! 链接类型目录
//!
//! The nine link-creation modes and the flags each one implies for the
//! draft. The table below is the only place those flags are defined; the
//! draft re-derives its state from it whenever the variant changes.

use serde::{Deserialize, Deserializer};
use serde_repr::Serialize_repr;
use strum::{EnumIter, IntoEnumIterator};

use super::models::FileLinkKind;

/// Link-creation mode. The discriminant is the wire tag sent to the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize_repr, EnumIter,
)]
#[repr(u8)]
pub enum LinkTypeVariant {
    #[default]
    File = 0,
    Files = 1,
    Dir = 2,
    Dirs = 3,
    DirAllFiles = 4,
    DirSurface = 5,
    Hard = 6,
    Hards = 7,
    HardsDirAllFiles = 8,
}

/// Flags derived from a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantTraits {
    pub source_is_directory: bool,
    pub allows_multiple_sources: bool,
    /// Whether the user may pick the name of the created link
    pub allows_custom_name: bool,
}

impl VariantTraits {
    const fn new(source_is_directory: bool, allows_multiple_sources: bool, allows_custom_name: bool) -> Self {
        Self {
            source_is_directory,
            allows_multiple_sources,
            allows_custom_name,
        }
    }

    /// Name entry is disabled whenever a custom name is not allowed
    pub fn name_disabled(&self) -> bool {
        !self.allows_custom_name
    }
}

/// One row of the catalog: what the UI shows and what selecting it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantEntry {
    pub variant: LinkTypeVariant,
    pub label: &'static str,
    /// Labels written by older hosts, accepted when decoding records
    pub aliases: &'static [&'static str],
    pub traits: VariantTraits,
}

/// Indexed by wire tag.
pub const VARIANT_TABLE: [VariantEntry; 9] = [
    VariantEntry {
        variant: LinkTypeVariant::File,
        label: "Single file",
        aliases: &["单文件"],
        traits: VariantTraits::new(false, false, true),
    },
    VariantEntry {
        variant: LinkTypeVariant::Files,
        label: "Multiple files",
        aliases: &["多文件"],
        traits: VariantTraits::new(false, true, false),
    },
    VariantEntry {
        variant: LinkTypeVariant::Dir,
        label: "Single directory",
        aliases: &["单目录", "单文件夹"],
        traits: VariantTraits::new(true, false, true),
    },
    VariantEntry {
        variant: LinkTypeVariant::Dirs,
        label: "Multiple directories",
        aliases: &["多目录", "多文件夹"],
        traits: VariantTraits::new(true, true, false),
    },
    // 目录下所有文件：文件名逐个派生，不允许自定义
    VariantEntry {
        variant: LinkTypeVariant::DirAllFiles,
        label: "All files in directory",
        aliases: &["所有文件"],
        traits: VariantTraits::new(true, false, false),
    },
    VariantEntry {
        variant: LinkTypeVariant::DirSurface,
        label: "Directory top level",
        aliases: &["文件夹第一层所有"],
        traits: VariantTraits::new(true, false, false),
    },
    VariantEntry {
        variant: LinkTypeVariant::Hard,
        label: "Single file (hard)",
        aliases: &["单文件(硬)", "单文件（硬）"],
        traits: VariantTraits::new(false, false, true),
    },
    VariantEntry {
        variant: LinkTypeVariant::Hards,
        label: "Multiple files (hard)",
        aliases: &["多文件(硬)", "多文件（硬）"],
        traits: VariantTraits::new(false, true, false),
    },
    VariantEntry {
        variant: LinkTypeVariant::HardsDirAllFiles,
        label: "All files in directory (hard)",
        aliases: &["所有文件(硬)", "所有文件（硬）"],
        traits: VariantTraits::new(true, false, false),
    },
];

impl LinkTypeVariant {
    /// Wire tag sent to the host
    pub fn wire_tag(self) -> u8 {
        self as u8
    }

    pub fn from_wire(tag: u8) -> Option<Self> {
        VARIANT_TABLE.get(tag as usize).map(|entry| entry.variant)
    }

    pub fn entry(self) -> &'static VariantEntry {
        &VARIANT_TABLE[self as usize]
    }

    pub fn traits(self) -> VariantTraits {
        self.entry().traits
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// Hard-link variants
    pub fn is_hard(self) -> bool {
        self.link_kind() == Some(FileLinkKind::Hard)
    }

    /// Primitive link created for each entry. `None` for [`Self::DirSurface`],
    /// which links files and directories with different kinds.
    pub fn link_kind(self) -> Option<FileLinkKind> {
        match self {
            Self::File | Self::Files | Self::DirAllFiles => Some(FileLinkKind::File),
            Self::Dir | Self::Dirs => Some(FileLinkKind::Dir),
            Self::Hard | Self::Hards | Self::HardsDirAllFiles => Some(FileLinkKind::Hard),
            Self::DirSurface => None,
        }
    }

    /// Lower-case, separator-free name used for lenient parsing
    fn compact_name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Files => "files",
            Self::Dir => "dir",
            Self::Dirs => "dirs",
            Self::DirAllFiles => "dirallfiles",
            Self::DirSurface => "dirsurface",
            Self::Hard => "hard",
            Self::Hards => "hards",
            Self::HardsDirAllFiles => "hardsdirallfiles",
        }
    }
}

/// All variants in wire order, for pickers.
pub fn catalog() -> &'static [VariantEntry] {
    &VARIANT_TABLE
}

impl std::fmt::Display for LinkTypeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LinkTypeVariant {
    type Err = String;

    /// Accepts a wire tag, a variant name in any case/separator style,
    /// or a label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(tag) = trimmed.parse::<u8>() {
            return Self::from_wire(tag).ok_or_else(|| format!("Unknown link type tag: {}", tag));
        }

        let compact: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        // 旧版本宿主的拼写
        if compact == "hardsdirallfiless" {
            return Ok(Self::HardsDirAllFiles);
        }
        if let Some(variant) = Self::iter().find(|v| v.compact_name() == compact) {
            return Ok(variant);
        }

        VARIANT_TABLE
            .iter()
            .find(|entry| {
                entry.label.eq_ignore_ascii_case(trimmed) || entry.aliases.contains(&trimmed)
            })
            .map(|entry| entry.variant)
            .ok_or_else(|| {
                format!(
                    "Invalid link type: '{}'. Valid: file, files, dir, dirs, dir-all-files, dir-surface, hard, hards, hards-dir-all-files",
                    s
                )
            })
    }
}

/// Host tags arrive as numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTag {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for LinkTypeVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTag::deserialize(deserializer)? {
            RawTag::Number(n) => u8::try_from(n)
                .ok()
                .and_then(Self::from_wire)
                .ok_or_else(|| serde::de::Error::custom(format!("Unknown link type tag: {}", n))),
            RawTag::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
