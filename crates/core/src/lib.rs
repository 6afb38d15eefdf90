//! Core shared types and errors (renderer-agnostic).

use std::{io, path::PathBuf};

use thiserror::Error;

pub use glam::{Vec2, Vec3, vec2, vec3};

/// Which per-corner attribute a face reference points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texcoord",
            Attribute::Normal => "normal",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot open mesh source '{}': {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A face corner points outside its pool. `index` is 0-based; `None`
    /// means the source index was 0 or unreadable.
    #[error(
        "Group '{group}', triangle {triangle}, corner {corner}: {attribute} index {} out of range (pool size {len})",
        .index.map_or_else(|| "<missing>".to_string(), |i| i.to_string())
    )]
    MalformedReference {
        group: String,
        triangle: usize,
        corner: usize,
        attribute: Attribute,
        index: Option<usize>,
        len: usize,
    },

    #[error("Too many vertices for 32-bit indices ({0})")]
    IndexOverflow(usize),

    #[error("Render backend error: {0}")]
    Backend(String),

    #[error("A mesh loader named '{0}' is already registered")]
    DuplicateLoader(String),

    #[error("No mesh loader for '{0}'")]
    NoLoader(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
