use async_trait::async_trait;
use std::sync::Arc;

use twocol_core::model::{CompletionSummary, CourseOptions, SectionCompletion};
use twocol_core::SiteConfig;

use crate::composer::context::{
    CompletionCounts, CompletionCountsView, Notice, NoticeLevel, OverviewContext, SectionContext,
    SummaryItem,
};
use crate::composer::topics::TopicsComposer;
use crate::composer::{PageComposer, PageRequest};
use crate::error::ComposeError;
use crate::host::CompletionProvider;
use crate::image::HeaderImageResolver;

/// Two-column layout: the topic composer plus header imagery, progress,
/// summary items and completion panels.
pub struct TwoColumnComposer {
    inner: TopicsComposer,
    site: SiteConfig,
    completion: Arc<dyn CompletionProvider>,
    images: HeaderImageResolver,
}

impl TwoColumnComposer {
    #[must_use]
    pub fn new(
        inner: TopicsComposer,
        site: SiteConfig,
        completion: Arc<dyn CompletionProvider>,
        images: HeaderImageResolver,
    ) -> Self {
        Self {
            inner,
            site,
            completion,
            images,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// Clamped to 0..=100 before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_percent(percent: f64) -> u32 {
    percent.clamp(0.0, 100.0).round() as u32
}

/// Summary items with a heading; icon and text never appear without one.
fn summary_items(options: &CourseOptions) -> Vec<SummaryItem> {
    options
        .summary_items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let heading = non_empty(&item.heading)?;
            Some(SummaryItem {
                slot: index + 1,
                heading,
                icon: item.icon,
                text: item
                    .text
                    .as_ref()
                    .filter(|t| !t.is_empty())
                    .map(|t| t.text.clone()),
            })
        })
        .collect()
}

#[async_trait]
impl PageComposer for TwoColumnComposer {
    async fn compose_overview(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<OverviewContext, ComposeError> {
        let mut ctx = self.inner.compose_overview(request).await?;
        let course = request.course;
        let viewer = request.viewer;
        let options = &request.options.course;
        let strings = viewer.locale.strings();
        let caps = viewer.capabilities;

        ctx.header_back_color = Some(options.header_back_color.clone());
        ctx.header_image_format = Some(options.header_image_format);
        if let Some(index) = options.header_image_index() {
            ctx.header_image = self.images.resolve(course, index).await?;
        }

        if let Some(percent) = self
            .completion
            .course_progress_percentage(course, viewer)
            .await?
        {
            ctx.has_progress = true;
            ctx.progress = Some(round_percent(percent));
        }

        for item in &mut ctx.sections {
            if let Some(section) = course.section(item.number) {
                item.completion = Some(SectionCompletion::for_section(section, viewer));
            }
        }

        ctx.details_heading = non_empty(&options.details_heading);
        ctx.resources_heading = non_empty(&options.resources_heading);
        ctx.summary_items = summary_items(options);

        let wants_criteria =
            options.completion_status && (caps.view_completion_stats || caps.update_course);
        let has_criteria = if wants_criteria {
            self.completion.has_criteria(course).await?
        } else {
            false
        };

        if options.completion_status && caps.view_completion_stats && has_criteria {
            let records = self.completion.tracked_users(course).await?;
            ctx.completion_counts = CompletionCounts::Shown(CompletionCountsView {
                summary: CompletionSummary::from_records(&records),
                complete_label: strings.users_complete.to_owned(),
                inprogress_label: strings.users_in_progress.to_owned(),
                notstarted_label: strings.users_not_started.to_owned(),
            });
            ctx.completion_url = Some(self.inner.urls().completion_report(course.id));
        }

        if options.completion_status
            && caps.update_course
            && !has_criteria
            && self.site.completion_nag()
        {
            let link = self.inner.urls().completion_settings(course.id);
            ctx.notice = Some(Notice {
                level: NoticeLevel::Warning,
                message: strings.no_completion_message(link.as_str()),
            });
        }

        ctx.reverse_display = options.reverse_display;
        tracing::debug!(
            course = %course.id,
            sections = ctx.sections.len(),
            stats = ctx.completion_counts.is_shown(),
            "composed course overview"
        );
        Ok(ctx)
    }

    async fn compose_single_page(
        &self,
        request: &PageRequest<'_>,
        number: u32,
    ) -> Result<SectionContext, ComposeError> {
        let mut ctx = self.inner.compose_single_page(request, number).await?;
        let course = request.course;
        let Some(section) = course.section(number) else {
            return Ok(ctx);
        };

        let completion = SectionCompletion::for_section(section, request.viewer);
        ctx.completion = Some(completion);
        ctx.has_progress = completion.has_total;
        ctx.progress = Some(completion.percent);

        let options = &request.options.course;
        ctx.header_back_color = Some(options.header_back_color.clone());
        ctx.section_image_format = Some(options.section_image_format);
        if let Some(index) = request.options.section_image_index(section.id) {
            ctx.header_image = self.images.resolve(course, index).await?;
        }
        Ok(ctx)
    }
}
