use std::sync::Arc;
use url::Url;

use storage::repository::UserPreferenceRepository;
use twocol_core::model::{CourseId, CourseOptions, PageLevel, ResumePoint, UserId, Viewer};
use twocol_core::{CourseUrls, SiteConfig};

use crate::error::ResumeError;

/// Remembers the last activity or course page a user viewed.
#[derive(Clone)]
pub struct ResumeService {
    urls: CourseUrls,
    preferences: Arc<dyn UserPreferenceRepository>,
}

impl ResumeService {
    #[must_use]
    pub fn new(site: &SiteConfig, preferences: Arc<dyn UserPreferenceRepository>) -> Self {
        Self {
            urls: CourseUrls::new(site),
            preferences,
        }
    }

    /// Record a page view as the user's resume point in the course.
    ///
    /// Only course and module `view.php` pages viewed by logged-in, non-guest
    /// users are recorded, and only when completion tracking is enabled for
    /// the course. Returns the stored point, if any.
    ///
    /// # Errors
    ///
    /// Returns `ResumeError` if the point cannot be encoded or stored.
    pub async fn record_page_view(
        &self,
        viewer: &Viewer,
        course: CourseId,
        options: &CourseOptions,
        level: PageLevel,
        page_url: &Url,
    ) -> Result<Option<ResumePoint>, ResumeError> {
        if !matches!(level, PageLevel::Course | PageLevel::Module) || !options.completion_tracking {
            return Ok(None);
        }
        let Some(user) = viewer.user_id.filter(|_| viewer.can_complete()) else {
            return Ok(None);
        };
        let Some(point) = ResumePoint::from_url(page_url) else {
            return Ok(None);
        };

        let encoded = serde_json::to_string(&point)?;
        self.preferences
            .set_preference(user, &ResumePoint::preference_name(course), &encoded)
            .await?;
        tracing::debug!(%course, %user, path = %point.path, "recorded resume point");
        Ok(Some(point))
    }

    /// Stored resume point; malformed stored values read as `None`.
    ///
    /// # Errors
    ///
    /// Returns `ResumeError::Storage` if the preference cannot be read.
    pub async fn resume_point(
        &self,
        user: UserId,
        course: CourseId,
    ) -> Result<Option<ResumePoint>, ResumeError> {
        let Some(stored) = self
            .preferences
            .get_preference(user, &ResumePoint::preference_name(course))
            .await?
        else {
            return Ok(None);
        };
        match serde_json::from_str(&stored) {
            Ok(point) => Ok(Some(point)),
            Err(err) => {
                tracing::warn!(%course, %user, error = %err, "ignoring malformed resume point");
                Ok(None)
            }
        }
    }

    /// Absolute URL of the stored resume point.
    ///
    /// # Errors
    ///
    /// Returns `ResumeError::Storage` if the preference cannot be read.
    pub async fn resume_url(
        &self,
        user: UserId,
        course: CourseId,
    ) -> Result<Option<Url>, ResumeError> {
        Ok(self
            .resume_point(user, course)
            .await?
            .map(|point| point.to_url(self.urls.root())))
    }
}
