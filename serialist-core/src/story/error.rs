//! Story error types

use thiserror::Error;

/// Errors raised by episode chain operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    /// No episode with this number exists in the chain
    #[error("episode {number} not found (chain has {len} episodes)")]
    EpisodeNotFound { number: u32, len: usize },

    /// A stored chain whose numbering does not run 1, 2, 3, ...
    #[error("episode at position {position} is numbered {found}, expected {expected}")]
    BrokenNumbering {
        position: usize,
        expected: u32,
        found: u32,
    },
}

/// Result type for story operations
pub type StoryResult<T> = Result<T, StoryError>;
