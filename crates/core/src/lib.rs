#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod model;
pub mod strings;
pub mod time;
pub mod urls;

pub use config::{SiteConfig, SiteConfigDraft, SiteConfigError};
pub use error::Error;
pub use strings::Locale;
pub use urls::CourseUrls;
