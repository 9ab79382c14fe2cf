use std::sync::Arc;

use storage::repository::Storage;
use storage::sqlite::SqliteInitError;
use twocol_core::model::CourseFormat;
use twocol_core::SiteConfig;

use crate::composer::{ComposerDeps, PageComposer, composer_for};
use crate::course_events::CourseEventHandler;
use crate::format_options_service::FormatOptionsService;
use crate::host::{CompletionProvider, CourseImageProvider};
use crate::image::HeaderImageResolver;
use crate::resume_service::ResumeService;

/// Assembles the format's services over one storage backend and host.
#[derive(Clone)]
pub struct FormatServices {
    storage: Storage,
    deps: ComposerDeps,
    resume: Arc<ResumeService>,
    events: Arc<CourseEventHandler>,
}

impl FormatServices {
    #[must_use]
    pub fn new(
        site: SiteConfig,
        storage: Storage,
        completion: Arc<dyn CompletionProvider>,
        images: Arc<dyn CourseImageProvider>,
    ) -> Self {
        let resolver = HeaderImageResolver::standard(Arc::clone(&storage.images), images);
        let resume = Arc::new(ResumeService::new(&site, Arc::clone(&storage.preferences)));
        let events = Arc::new(CourseEventHandler::new(
            Arc::clone(&storage.images),
            Arc::clone(&storage.options),
        ));
        Self {
            storage,
            deps: ComposerDeps {
                site,
                completion,
                images: resolver,
            },
            resume,
            events,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        site: SiteConfig,
        completion: Arc<dyn CompletionProvider>,
        images: Arc<dyn CourseImageProvider>,
    ) -> Result<Self, SqliteInitError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(site, storage, completion, images))
    }

    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        &self.deps.site
    }

    /// Composer for a course's format.
    #[must_use]
    pub fn composer(&self, format: CourseFormat) -> Arc<dyn PageComposer> {
        composer_for(format, &self.deps)
    }

    /// Fresh options service; its memo lives as long as the returned value.
    #[must_use]
    pub fn format_options(&self) -> FormatOptionsService {
        FormatOptionsService::new(&self.deps.site, Arc::clone(&self.storage.options))
    }

    #[must_use]
    pub fn resume(&self) -> Arc<ResumeService> {
        Arc::clone(&self.resume)
    }

    #[must_use]
    pub fn events(&self) -> Arc<CourseEventHandler> {
        Arc::clone(&self.events)
    }
}
