// SPDX-License-Identifier: MIT

//! Application error types.
//!
//! Every operation surfaces its failure to the caller; no automatic retry
//! happens inside the crate. Callers decide retry policy.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// A multi-step delete where some but not all steps succeeded.
    ///
    /// Cascades run without compensating transactions, so a partial failure
    /// can leave orphaned documents behind. Surfaced as a distinct kind so
    /// callers can flag the record for cleanup instead of silently leaving
    /// orphans.
    #[error("Partial cascade failure: {deleted} deleted, {failed} failed")]
    PartialCascade { deleted: usize, failed: usize },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Store request timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
