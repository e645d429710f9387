//! Error types for decoding and encoding.
//!
//! Decoding and encoding are all-or-nothing: a failure carries no partial tree
//! and no partial output guarantee beyond what was already written to a sink.

use std::io;

use polyglot_common::SourcePosition;
use thiserror::Error;

use crate::encoding::EncodingError;

/// Failure to turn markup text into a tree.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input cannot form a well-formed tree: a mismatched or missing end
    /// tag, a character that is not allowed where it appears, or truncated input.
    #[error("malformed markup at {position}: {detail}")]
    MalformedMarkup {
        /// Where the problem was detected.
        position: SourcePosition,
        /// Human-readable description.
        detail: String,
    },

    /// A `&name;` reference that is not in the named character reference table.
    #[error("unknown entity &{name}; at {position}")]
    UnknownEntity {
        /// The entity name, without `&` and `;`.
        name: String,
        /// Position of the `&`.
        position: SourcePosition,
    },

    /// The bytes cannot be decoded with the declared or sniffed encoding.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl DecodeError {
    /// Convenience constructor for [`DecodeError::MalformedMarkup`].
    #[must_use]
    pub fn malformed(position: SourcePosition, detail: impl Into<String>) -> Self {
        Self::MalformedMarkup {
            position,
            detail: detail.into(),
        }
    }

    /// Source position of the failure, when it has one.
    #[must_use]
    pub const fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::MalformedMarkup { position, .. } | Self::UnknownEntity { position, .. } => {
                Some(*position)
            }
            Self::Encoding(_) => None,
        }
    }
}

/// Failure to write markup to a sink.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The destination reported an I/O error.
    #[error("failed to write markup: {0}")]
    Io(#[from] io::Error),
}
