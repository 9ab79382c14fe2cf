use thiserror::Error;
use url::Url;

use crate::model::options::HiddenSections;

/// Site-wide settings the format reads but does not own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    wwwroot: Url,
    completion_nag: bool,
    default_hidden_sections: HiddenSections,
}

#[derive(Clone, Debug, Default)]
pub struct SiteConfigDraft {
    pub wwwroot: Option<String>,
    pub completion_nag: Option<bool>,
    pub default_hidden_sections: Option<HiddenSections>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SiteConfigError {
    #[error("site root URL is missing")]
    MissingRoot,
    #[error("invalid site root URL: {0}")]
    InvalidRoot(#[from] url::ParseError),
    #[error("site root URL cannot carry paths: {0}")]
    NotABase(String),
    #[error("invalid hidden sections mode: {0}")]
    InvalidHiddenSections(String),
}

impl SiteConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the draft from `TWOCOL_WWWROOT`, `TWOCOL_COMPLETION_NAG` and
    /// `TWOCOL_HIDDEN_SECTIONS`.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigError::InvalidHiddenSections` if the mode is not `0` or `1`.
    pub fn from_env() -> Result<Self, SiteConfigError> {
        let wwwroot = std::env::var("TWOCOL_WWWROOT").ok();
        let completion_nag = std::env::var("TWOCOL_COMPLETION_NAG")
            .ok()
            .map(|v| parse_flag(&v));
        let default_hidden_sections = match std::env::var("TWOCOL_HIDDEN_SECTIONS") {
            Ok(v) => Some(
                HiddenSections::from_stored(&v)
                    .ok_or(SiteConfigError::InvalidHiddenSections(v))?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            wwwroot,
            completion_nag,
            default_hidden_sections,
        })
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigError` if the site root is missing or not an absolute base URL.
    pub fn validate(self) -> Result<SiteConfig, SiteConfigError> {
        let raw = self
            .wwwroot
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(SiteConfigError::MissingRoot)?;
        // A trailing slash keeps `Url::join` from dropping the last path segment.
        let wwwroot = Url::parse(&format!("{raw}/"))?;
        if wwwroot.cannot_be_a_base() {
            return Err(SiteConfigError::NotABase(raw));
        }

        Ok(SiteConfig {
            wwwroot,
            completion_nag: self.completion_nag.unwrap_or(true),
            default_hidden_sections: self.default_hidden_sections.unwrap_or_default(),
        })
    }
}

impl SiteConfig {
    /// Convenience for callers that already hold a validated root.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigError` if `wwwroot` is not a usable base URL.
    pub fn new(wwwroot: &str) -> Result<Self, SiteConfigError> {
        SiteConfigDraft {
            wwwroot: Some(wwwroot.to_owned()),
            ..SiteConfigDraft::default()
        }
        .validate()
    }

    /// Load from the environment.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigError` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, SiteConfigError> {
        SiteConfigDraft::from_env()?.validate()
    }

    #[must_use]
    pub fn with_completion_nag(mut self, enabled: bool) -> Self {
        self.completion_nag = enabled;
        self
    }

    #[must_use]
    pub fn with_default_hidden_sections(mut self, mode: HiddenSections) -> Self {
        self.default_hidden_sections = mode;
        self
    }

    /// Site root, always ending in `/`.
    #[must_use]
    pub fn wwwroot(&self) -> &Url {
        &self.wwwroot
    }

    #[must_use]
    pub fn completion_nag(&self) -> bool {
        self.completion_nag
    }

    #[must_use]
    pub fn default_hidden_sections(&self) -> HiddenSections {
        self.default_hidden_sections
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_normalizes_root() {
        let config = SiteConfigDraft {
            wwwroot: Some(" https://lms.example.edu/moodle/ ".into()),
            ..SiteConfigDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(config.wwwroot().as_str(), "https://lms.example.edu/moodle/");
        assert!(config.completion_nag());
        assert_eq!(config.default_hidden_sections(), HiddenSections::Collapsed);
    }

    #[test]
    fn missing_root_is_rejected() {
        let err = SiteConfigDraft::new().validate().unwrap_err();
        assert!(matches!(err, SiteConfigError::MissingRoot));
    }

    #[test]
    fn relative_root_is_rejected() {
        let err = SiteConfig::new("lms.example.edu").unwrap_err();
        assert!(matches!(err, SiteConfigError::InvalidRoot(_)));
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }
}
