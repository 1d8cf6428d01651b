//! Core error types.

use thiserror::Error;

/// Errors produced by the playback core.
///
/// None of these are fatal. [`CoreError::NoScriptMatch`] is the only one a
/// user can trigger; the conversation turns it into a help message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No script matched a free-text query.
    #[error("no script matches query '{query}'")]
    NoScriptMatch {
        /// The query as submitted.
        query: String,
    },

    /// A script id was not found in the repository.
    #[error("unknown script '{id}'")]
    UnknownScript {
        /// The requested id.
        id: String,
    },

    /// A script violates an authoring invariant.
    #[error("invalid script '{script}': {reason}")]
    InvalidScript {
        /// Id of the offending script.
        script: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
