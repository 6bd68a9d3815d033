//! Conversion errors
//!
//! Every variant is fatal for the file being converted. Importer warnings
//! never reach this type; they are logged and conversion continues.

use std::fmt;
use std::path::PathBuf;

use bake_common::FormatError;
use thiserror::Error;

use crate::import::ErrorCode;

/// What kind of index failed to resolve during consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Node,
    Joint,
    Material,
    Mesh,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Node => "node",
            Self::Joint => "joint",
            Self::Material => "material",
            Self::Mesh => "mesh group",
        })
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("import failed ({code}): {message}")]
    Import { code: ErrorCode, message: String },

    #[error("node {node} references parent {parent}, which does not precede it")]
    Hierarchy { node: usize, parent: i32 },

    #[error("{kind} reference {index} does not resolve")]
    Consistency { kind: ReferenceKind, index: i64 },

    #[error(
        "mesh '{mesh}': vertex semantic {semantic} exceeds the {} attribute slot budget",
        bake_common::MAX_ATTRIBUTE_SLOTS
    )]
    AttributeBudget { mesh: String, semantic: u8 },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("failed to write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn consistency(kind: ReferenceKind, index: impl TryInto<i64>) -> Self {
        Self::Consistency {
            kind,
            index: index.try_into().unwrap_or(i64::MAX),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
