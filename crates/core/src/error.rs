use thiserror::Error;

use crate::config::SiteConfigError;
use crate::model::ParseIdError;

/// Umbrella error for fallible core constructors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    SiteConfig(#[from] SiteConfigError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
