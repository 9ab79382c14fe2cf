use std::sync::Arc;

use storage::image_cache::HeaderImageCache;
use storage::repository::{FormatOptionRepository, StorageError};
use twocol_core::model::{CourseId, SectionId};

/// Host events the format reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseEvent {
    /// Course settings changed, possibly including its image.
    Updated { course: CourseId },
    /// A section was removed from the course.
    SectionDeleted { course: CourseId, section: SectionId },
}

/// Keeps caches and stored options consistent with host changes.
#[derive(Clone)]
pub struct CourseEventHandler {
    images: Arc<dyn HeaderImageCache>,
    options: Arc<dyn FormatOptionRepository>,
}

impl CourseEventHandler {
    #[must_use]
    pub fn new(images: Arc<dyn HeaderImageCache>, options: Arc<dyn FormatOptionRepository>) -> Self {
        Self { images, options }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the cache or option store cannot be updated.
    pub async fn handle(&self, event: CourseEvent) -> Result<(), StorageError> {
        match event {
            CourseEvent::Updated { course } => {
                let removed = self.images.delete_course(course).await?;
                tracing::info!(%course, removed, "course updated; header images purged");
            }
            CourseEvent::SectionDeleted { course, section } => {
                self.options.delete_section_options(course, section).await?;
                tracing::info!(%course, %section, "section deleted; section options removed");
            }
        }
        Ok(())
    }
}
