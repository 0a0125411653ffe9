//! Outline providers: where the tree's structure comes from.
//!
//! The built-in outline covers LOCC class QH (Natural history, Biology). A
//! plain-text outline file lists one category per line in pre-order; blank
//! lines and `#` comments are ignored.

use std::path::{Path, PathBuf};

use crate::error::{SourceError, SourceResult};

/// LOCC subclass QH, pre-order.
pub const BUILTIN_QH: &[&str] = &[
    "QH1-278.5",
    "QH1-199.5",
    "QH201-278.5",
    "QH301-705.5",
    "QH359-425",
    "QH426-470",
    "QH471-489",
    "QH501-531",
    "QH540-549.5",
    "QH573-671",
    "QH705-705.5",
];

/// Where to read outline entries from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutlineSource {
    #[default]
    Builtin,
    File(PathBuf),
}

impl OutlineSource {
    pub fn from_path(path: Option<&Path>) -> Self {
        path.map_or(Self::Builtin, |p| Self::File(p.to_path_buf()))
    }

    /// Produce the outline entries in order.
    pub fn load(&self) -> SourceResult<Vec<String>> {
        match self {
            Self::Builtin => Ok(BUILTIN_QH.iter().map(|s| s.to_string()).collect()),
            Self::File(path) => read_outline(path),
        }
    }
}

impl std::fmt::Display for OutlineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in QH outline"),
            Self::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Read an outline file. A file with no entries is an error.
pub fn read_outline(path: &Path) -> SourceResult<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| SourceError::Read {
        kind: "outline",
        path: path.display().to_string(),
        source: e,
    })?;
    let entries = parse_outline(&text);
    if entries.is_empty() {
        return Err(SourceError::Empty {
            kind: "outline",
            path: path.display().to_string(),
        });
    }
    tracing::debug!(path = %path.display(), entries = entries.len(), "outline read");
    Ok(entries)
}

/// One entry per non-blank, non-comment line. Trailing `# ...` is stripped.
pub fn parse_outline(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
