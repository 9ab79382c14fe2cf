//! Page composers turning a course and its options into template contexts.

mod context;
pub mod sections;
mod topics;
mod twocol;

use async_trait::async_trait;
use std::sync::Arc;

use twocol_core::model::{Course, CourseFormat, DisplayOptions, Viewer};
use twocol_core::SiteConfig;

use crate::error::ComposeError;
use crate::host::CompletionProvider;
use crate::image::HeaderImageResolver;

pub use context::{
    ActivityItem, AddActivityControl, CompletionCounts, CompletionCountsView, ControlMenu,
    ControlMenuItem, CourseLink, EditingSection, JumpMenu, JumpOption, NavLink, Notice,
    NoticeLevel, OverviewContext, PageContext, SectionAction, SectionContext, SectionListItem,
    SummaryItem,
};
pub use topics::TopicsComposer;
pub use twocol::TwoColumnComposer;

/// Everything a composer needs to know about the current page view.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub course: &'a Course,
    pub viewer: &'a Viewer,
    pub options: &'a DisplayOptions,
    /// Requested section number; `None` or `0` means the overview.
    pub section: Option<u32>,
    /// Edit mode toggled on by the viewer.
    pub editing: bool,
}

impl<'a> PageRequest<'a> {
    #[must_use]
    pub fn new(course: &'a Course, viewer: &'a Viewer, options: &'a DisplayOptions) -> Self {
        Self {
            course,
            viewer,
            options,
            section: None,
            editing: false,
        }
    }

    #[must_use]
    pub fn with_section(mut self, section: u32) -> Self {
        self.section = Some(section);
        self
    }

    #[must_use]
    pub fn with_editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    /// Section to show on its own page, if any.
    #[must_use]
    pub fn requested_section(&self) -> Option<u32> {
        self.section.filter(|n| *n != 0)
    }

    /// Edit mode is on and the viewer may edit the course.
    #[must_use]
    pub fn shows_editor(&self) -> bool {
        self.editing && self.viewer.capabilities.update_course
    }

    #[must_use]
    pub fn can_add_activities(&self) -> bool {
        self.editing && self.viewer.capabilities.manage_activities
    }
}

/// Builds page contexts for one course format.
#[async_trait]
pub trait PageComposer: Send + Sync {
    /// Course overview: summary column and section list.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError` if a collaborator fails.
    async fn compose_overview(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<OverviewContext, ComposeError>;

    /// Page of a single section.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::NotFoundOrForbidden` if the section does not
    /// exist or is not visible to the viewer, and `ComposeError` if a
    /// collaborator fails.
    async fn compose_single_page(
        &self,
        request: &PageRequest<'_>,
        section: u32,
    ) -> Result<SectionContext, ComposeError>;

    /// Compose whichever page the request asks for.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the selected page.
    async fn compose(&self, request: &PageRequest<'_>) -> Result<PageContext, ComposeError> {
        match request.requested_section() {
            Some(section) => {
                let ctx = self.compose_single_page(request, section).await?;
                Ok(PageContext::SingleSection(Box::new(ctx)))
            }
            None => {
                let ctx = self.compose_overview(request).await?;
                Ok(PageContext::Overview(Box::new(ctx)))
            }
        }
    }
}

/// Collaborators shared by the composers.
#[derive(Clone)]
pub struct ComposerDeps {
    pub site: SiteConfig,
    pub completion: Arc<dyn CompletionProvider>,
    pub images: HeaderImageResolver,
}

/// Select the composer for a course format.
#[must_use]
pub fn composer_for(format: CourseFormat, deps: &ComposerDeps) -> Arc<dyn PageComposer> {
    let topics = TopicsComposer::new(&deps.site);
    match format {
        CourseFormat::Topics => Arc::new(topics),
        CourseFormat::TwoCol => Arc::new(TwoColumnComposer::new(
            topics,
            deps.site.clone(),
            Arc::clone(&deps.completion),
            deps.images.clone(),
        )),
    }
}
