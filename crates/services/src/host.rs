//! Collaborators the host platform provides to the composers.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use twocol_core::model::{Course, CourseCompletionRecord, CourseId, UserId, Viewer};

use crate::error::HostError;
use crate::image::generated_pattern;

/// Completion data owned by the host.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Viewer's course progress in percent.
    ///
    /// Returns `Ok(None)` when the viewer has no completion criteria to meet.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the completion service is unavailable.
    async fn course_progress_percentage(
        &self,
        course: &Course,
        viewer: &Viewer,
    ) -> Result<Option<f64>, HostError>;

    /// Whether course completion criteria are configured.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the completion service is unavailable.
    async fn has_criteria(&self, course: &Course) -> Result<bool, HostError>;

    /// Completion records of every user tracked in the course.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the completion service is unavailable.
    async fn tracked_users(&self, course: &Course) -> Result<Vec<CourseCompletionRecord>, HostError>;
}

/// Course imagery owned by the host.
#[async_trait]
pub trait CourseImageProvider: Send + Sync {
    /// Image from the course's own metadata, if one was uploaded.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the file service is unavailable.
    async fn course_image(&self, course: &Course) -> Result<Option<String>, HostError>;

    /// Placeholder image for a course without imagery.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if a host-rendered placeholder cannot be produced.
    async fn generated_image(&self, course: &Course) -> Result<String, HostError> {
        Ok(generated_pattern(course.id))
    }
}

#[derive(Default)]
struct HostState {
    progress: HashMap<(CourseId, UserId), f64>,
    criteria: HashSet<CourseId>,
    tracked: HashMap<CourseId, Vec<CourseCompletionRecord>>,
    images: HashMap<CourseId, String>,
}

/// Host collaborators backed by in-process maps, for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl InMemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state(&self, f: impl FnOnce(&mut HostState)) {
        if let Ok(mut guard) = self.state.lock() {
            f(&mut guard);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&HostState) -> T) -> Result<T, HostError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| HostError::Unavailable(e.to_string()))?;
        Ok(f(&guard))
    }

    /// Mark the course as having completion criteria.
    pub fn set_criteria(&self, course: CourseId) {
        self.with_state(|s| {
            s.criteria.insert(course);
        });
    }

    pub fn set_progress(&self, course: CourseId, user: UserId, percent: f64) {
        self.with_state(|s| {
            s.progress.insert((course, user), percent);
        });
    }

    pub fn set_tracked_users(&self, course: CourseId, records: Vec<CourseCompletionRecord>) {
        self.with_state(|s| {
            s.tracked.insert(course, records);
        });
    }

    pub fn set_course_image(&self, course: CourseId, url: impl Into<String>) {
        let url = url.into();
        self.with_state(|s| {
            s.images.insert(course, url);
        });
    }
}

#[async_trait]
impl CompletionProvider for InMemoryHost {
    async fn course_progress_percentage(
        &self,
        course: &Course,
        viewer: &Viewer,
    ) -> Result<Option<f64>, HostError> {
        let Some(user) = viewer.user_id else {
            return Ok(None);
        };
        self.read(|s| {
            if s.criteria.contains(&course.id) {
                s.progress.get(&(course.id, user)).copied()
            } else {
                None
            }
        })
    }

    async fn has_criteria(&self, course: &Course) -> Result<bool, HostError> {
        self.read(|s| s.criteria.contains(&course.id))
    }

    async fn tracked_users(&self, course: &Course) -> Result<Vec<CourseCompletionRecord>, HostError> {
        self.read(|s| s.tracked.get(&course.id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CourseImageProvider for InMemoryHost {
    async fn course_image(&self, course: &Course) -> Result<Option<String>, HostError> {
        self.read(|s| s.images.get(&course.id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twocol_core::model::CourseFormat;

    fn course() -> Course {
        Course::new(CourseId::new(8), "Host course", CourseFormat::TwoCol)
    }

    #[tokio::test]
    async fn progress_requires_criteria_and_login() {
        let host = InMemoryHost::new();
        let course = course();
        let student = Viewer::student(UserId::new(3));
        host.set_progress(course.id, UserId::new(3), 62.5);

        assert_eq!(
            host.course_progress_percentage(&course, &student).await.unwrap(),
            None
        );
        host.set_criteria(course.id);
        assert_eq!(
            host.course_progress_percentage(&course, &student).await.unwrap(),
            Some(62.5)
        );
        assert_eq!(
            host.course_progress_percentage(&course, &Viewer::anonymous())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn default_generated_image_is_stable() {
        let host = InMemoryHost::new();
        let a = host.generated_image(&course()).await.unwrap();
        let b = host.generated_image(&course()).await.unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("data:image/svg+xml"));
    }
}
