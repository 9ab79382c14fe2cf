//! Shared error types for the services crate.

use thiserror::Error;
use url::Url;

use storage::repository::StorageError;

/// Errors surfaced by host collaborators (completion, course images).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    #[error("host service unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted while composing a course page.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComposeError {
    /// The requested section does not exist or is not visible to the viewer.
    ///
    /// Carries the course name and URL so the caller can link back.
    #[error("section {section} of {course_name} is unknown or not visible")]
    NotFoundOrForbidden {
        section: u32,
        course_name: String,
        course_url: Url,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors emitted by `FormatOptionsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatOptionsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResumeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResumeError {
    #[error("resume point could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
