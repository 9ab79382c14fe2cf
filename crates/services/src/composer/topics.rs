use async_trait::async_trait;
use url::Url;

use twocol_core::model::{Course, Section, Viewer};
use twocol_core::strings::Strings;
use twocol_core::{CourseUrls, SiteConfig};

use crate::composer::context::{
    ActivityItem, AddActivityControl, CompletionCounts, ControlMenu, ControlMenuItem, CourseLink,
    EditingSection, JumpMenu, JumpOption, NavLink, OverviewContext, SectionAction,
    SectionContext, SectionListItem,
};
use crate::composer::sections::{can_view_hidden, jump_targets, listed_sections, neighbours};
use crate::composer::{PageComposer, PageRequest};
use crate::error::ComposeError;

/// Plain topic-list composer: summary, section list, navigation and editing
/// controls, without imagery or completion panels.
#[derive(Debug, Clone)]
pub struct TopicsComposer {
    urls: CourseUrls,
}

impl TopicsComposer {
    #[must_use]
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            urls: CourseUrls::new(site),
        }
    }

    #[must_use]
    pub fn urls(&self) -> &CourseUrls {
        &self.urls
    }

    /// Canonical link of a section; section 0 links to the course page.
    fn section_url(&self, course: &Course, number: u32) -> Url {
        self.urls
            .course_view(course.id, (number != 0).then_some(number))
    }

    fn activity_items(&self, section: &Section, request: &PageRequest<'_>) -> Vec<ActivityItem> {
        let show_hidden = request.can_add_activities();
        section
            .activities
            .iter()
            .filter(|a| a.user_visible || show_hidden)
            .map(|a| ActivityItem {
                id: a.id,
                name: a.name.clone(),
                kind: a.kind.clone(),
                url: self.urls.activity_view(&a.kind, a.id),
                dimmed: !a.visible,
                completion: (a.tracking.is_enabled() && request.viewer.can_complete())
                    .then_some(a.state),
            })
            .collect()
    }

    fn add_activity(&self, course: &Course, section: u32, return_section: u32) -> AddActivityControl {
        AddActivityControl {
            section,
            url: self.urls.add_activity(course.id, section, return_section),
        }
    }

    fn control_menu(&self, course: &Course, section: &Section, return_section: u32) -> ControlMenu {
        let mut items = vec![ControlMenuItem {
            action: SectionAction::Edit,
            url: self.urls.edit_section(section.id, return_section),
        }];
        if section.number != 0 {
            let (action, marker) = if course.is_highlighted(section.number) {
                (SectionAction::Unhighlight, 0)
            } else {
                (SectionAction::Highlight, section.number)
            };
            items.push(ControlMenuItem {
                action,
                url: self.urls.section_action(course.id, "marker", marker),
            });
            let (action, key) = if section.visible {
                (SectionAction::Hide, "hide")
            } else {
                (SectionAction::Show, "show")
            };
            items.push(ControlMenuItem {
                action,
                url: self.urls.section_action(course.id, key, section.number),
            });
        }
        ControlMenu {
            section: section.number,
            items,
        }
    }

    fn list_item(&self, course: &Course, section: &Section, strings: &Strings) -> SectionListItem {
        SectionListItem {
            number: section.number,
            name: section.display_name(strings),
            url: self.section_url(course, section.number),
            dimmed: !section.visible || !section.available,
            current: course.is_highlighted(section.number),
            availability_info: section
                .has_availability_info()
                .then(|| section.availability_info.clone())
                .flatten(),
            completion: None,
        }
    }

    fn editing_section(&self, request: &PageRequest<'_>, section: &Section) -> EditingSection {
        let course = request.course;
        let strings = request.viewer.locale.strings();
        EditingSection {
            number: section.number,
            name: section.display_name(strings),
            url: self.section_url(course, section.number),
            visible: section.visible,
            stealth: section.number > course.last_section_number,
            summary: section.summary.text.clone(),
            activities: self.activity_items(section, request),
            control_menu: self.control_menu(course, section, 0),
            add_activity: self.add_activity(course, section.number, 0),
        }
    }

    fn nav_link(&self, course: &Course, section: &Section, label: &str, strings: &Strings) -> NavLink {
        NavLink {
            number: section.number,
            label: label.to_owned(),
            name: section.display_name(strings),
            url: self.section_url(course, section.number),
            dimmed: !section.visible,
        }
    }

    fn jump_menu(&self, request: &PageRequest<'_>, current: u32) -> JumpMenu {
        let course = request.course;
        let strings = request.viewer.locale.strings();
        let main = JumpOption {
            label: strings.main_course_page.to_owned(),
            url: self.urls.course_view(course.id, None),
        };
        let targets = jump_targets(course, current, request.options.course.hidden_sections).map(
            |s| JumpOption {
                label: s.display_name(strings),
                url: self.section_url(course, s.number),
            },
        );
        JumpMenu {
            prompt: strings.jump_to.to_owned(),
            options: std::iter::once(main).chain(targets).collect(),
        }
    }

    fn visible_section<'c>(
        &self,
        course: &'c Course,
        viewer: &Viewer,
        number: u32,
    ) -> Result<&'c Section, ComposeError> {
        course
            .section(number)
            .filter(|s| s.user_visible)
            .ok_or_else(|| {
                tracing::debug!(course = %course.id, section = number, user = ?viewer.user_id, "section not viewable");
                ComposeError::NotFoundOrForbidden {
                    section: number,
                    course_name: course.full_name.clone(),
                    course_url: self.urls.course_view(course.id, None),
                }
            })
    }
}

#[async_trait]
impl PageComposer for TopicsComposer {
    async fn compose_overview(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<OverviewContext, ComposeError> {
        let course = request.course;
        let strings = request.viewer.locale.strings();
        let general = course.general_section();
        let editing = request.shows_editor();

        let sections = listed_sections(course, &request.options.course)
            .map(|s| self.list_item(course, s, strings))
            .collect();
        let editing_sections = editing.then(|| {
            course
                .numbered_sections()
                .chain(course.orphaned_sections())
                .map(|s| self.editing_section(request, s))
                .collect()
        });

        Ok(OverviewContext {
            course_name: course.full_name.clone(),
            summary_name: general.map_or_else(
                || strings.default_section_name(0),
                |s| s.display_name(strings),
            ),
            summary: general.map(|s| s.summary.text.clone()).unwrap_or_default(),
            activities: general
                .map(|s| self.activity_items(s, request))
                .unwrap_or_default(),
            add_activity: request
                .can_add_activities()
                .then(|| self.add_activity(course, 0, 0)),
            control_menu: general
                .filter(|_| editing)
                .map(|s| self.control_menu(course, s, 0)),
            sections,
            editing_sections,
            header_image: None,
            header_back_color: None,
            header_image_format: None,
            progress_title: strings.progress_title_course.to_owned(),
            has_progress: false,
            progress: None,
            details_heading: None,
            resources_heading: None,
            summary_items: Vec::new(),
            completion_counts: CompletionCounts::Hidden,
            completion_url: None,
            notice: None,
            reverse_display: false,
        })
    }

    async fn compose_single_page(
        &self,
        request: &PageRequest<'_>,
        number: u32,
    ) -> Result<SectionContext, ComposeError> {
        let course = request.course;
        let viewer = request.viewer;
        let strings = viewer.locale.strings();
        let section = self.visible_section(course, viewer, number)?;

        let (previous, next) = neighbours(
            course,
            number,
            can_view_hidden(viewer, &request.options.course),
        );

        Ok(SectionContext {
            number,
            name: section.display_name(strings),
            summary: section.summary.text.clone(),
            dimmed: !section.visible,
            availability_info: section
                .has_availability_info()
                .then(|| section.availability_info.clone())
                .flatten(),
            activities: self.activity_items(section, request),
            add_activity: request
                .can_add_activities()
                .then(|| self.add_activity(course, number, number)),
            control_menu: request
                .shows_editor()
                .then(|| self.control_menu(course, section, number)),
            previous: previous.map(|s| self.nav_link(course, s, strings.previous, strings)),
            next: next.map(|s| self.nav_link(course, s, strings.next, strings)),
            jump_menu: self.jump_menu(request, number),
            course_link: CourseLink {
                url: self.urls.course_view(course.id, None),
                label: strings.home.to_owned(),
                title: strings.home_tip.to_owned(),
            },
            completion: None,
            header_image: None,
            header_back_color: None,
            section_image_format: None,
            progress_title: strings.progress_title_section.to_owned(),
            has_progress: false,
            progress: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twocol_core::model::{
        Activity, CourseFormat, CourseId, DisplayOptions, ModuleId, SectionId, UserId,
    };

    fn site() -> SiteConfig {
        SiteConfig::new("https://lms.test").unwrap()
    }

    fn course() -> Course {
        let mut hidden = Section::new(SectionId::new(12), 2).named("Hidden week");
        hidden.visible = false;
        hidden.user_visible = false;
        Course::new(CourseId::new(4), "Topics course", CourseFormat::Topics).with_sections(vec![
            Section::new(SectionId::new(10), 0).with_activities(vec![
                Activity::new(ModuleId::new(1), "forum", "News"),
                Activity::new(ModuleId::new(2), "page", "Draft").hidden(),
            ]),
            Section::new(SectionId::new(11), 1),
            hidden,
            Section::new(SectionId::new(13), 3),
        ])
    }

    #[tokio::test]
    async fn overview_for_student_has_no_editing_payload() {
        let course = course();
        let viewer = Viewer::student(UserId::new(5));
        let options = DisplayOptions::default();
        let request = PageRequest::new(&course, &viewer, &options).with_editing(true);

        let ctx = TopicsComposer::new(&site())
            .compose_overview(&request)
            .await
            .unwrap();
        assert_eq!(ctx.summary_name, "Overview");
        assert_eq!(ctx.activities.len(), 1);
        assert!(ctx.add_activity.is_none());
        assert!(ctx.control_menu.is_none());
        assert!(ctx.editing_sections.is_none());
        assert!(!ctx.completion_counts.is_shown());
        let numbers: Vec<u32> = ctx.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(ctx.sections[1].dimmed);
    }

    #[tokio::test]
    async fn editing_overview_lists_every_section_with_controls() {
        let course = course();
        let viewer = Viewer::teacher(UserId::new(1));
        let options = DisplayOptions::default();
        let request = PageRequest::new(&course, &viewer, &options).with_editing(true);

        let ctx = TopicsComposer::new(&site())
            .compose_overview(&request)
            .await
            .unwrap();
        assert_eq!(ctx.activities.len(), 2);
        assert_eq!(
            ctx.add_activity.unwrap().url.as_str(),
            "https://lms.test/course/modedit.php?course=4&section=0&return=0&sr=0"
        );
        let menu = ctx.control_menu.unwrap();
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].action, SectionAction::Edit);

        let editing = ctx.editing_sections.unwrap();
        assert_eq!(editing.len(), 3);
        let hidden = &editing[1];
        assert!(!hidden.visible);
        assert!(hidden
            .control_menu
            .items
            .iter()
            .any(|i| i.action == SectionAction::Show));
    }

    #[tokio::test]
    async fn single_page_links_neighbours_and_jump_targets() {
        let course = course();
        let viewer = Viewer::student(UserId::new(5));
        let options = DisplayOptions::default();
        let request = PageRequest::new(&course, &viewer, &options);

        let ctx = TopicsComposer::new(&site())
            .compose_single_page(&request, 1)
            .await
            .unwrap();
        assert_eq!(ctx.name, "Topic 1");
        let previous = ctx.previous.unwrap();
        assert_eq!(previous.number, 0);
        assert_eq!(previous.url.as_str(), "https://lms.test/course/view.php?id=4");
        // Collapsed by default, so the hidden section is linked but dimmed.
        let next = ctx.next.unwrap();
        assert_eq!(next.number, 2);
        assert!(next.dimmed);

        let labels: Vec<&str> = ctx.jump_menu.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Main course page", "Hidden week", "Topic 3"]);
        assert_eq!(ctx.course_link.label, "Course home");
    }

    #[tokio::test]
    async fn hidden_section_page_is_forbidden() {
        let course = course();
        let viewer = Viewer::student(UserId::new(5));
        let options = DisplayOptions::default();
        let request = PageRequest::new(&course, &viewer, &options);

        let err = TopicsComposer::new(&site())
            .compose_single_page(&request, 2)
            .await
            .unwrap_err();
        match err {
            ComposeError::NotFoundOrForbidden {
                course_name,
                course_url,
                ..
            } => {
                assert_eq!(course_name, "Topics course");
                assert_eq!(course_url.as_str(), "https://lms.test/course/view.php?id=4");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn compose_dispatches_on_requested_section() {
        let course = course();
        let viewer = Viewer::student(UserId::new(5));
        let options = DisplayOptions::default();
        let composer = TopicsComposer::new(&site());

        let overview = PageRequest::new(&course, &viewer, &options).with_section(0);
        assert!(matches!(
            composer.compose(&overview).await.unwrap(),
            crate::composer::PageContext::Overview(_)
        ));
        let single = PageRequest::new(&course, &viewer, &options).with_section(3);
        assert!(matches!(
            composer.compose(&single).await.unwrap(),
            crate::composer::PageContext::SingleSection(_)
        ));
    }

    #[tokio::test]
    async fn editors_see_orphaned_sections_with_activities() {
        let course = Course::new(CourseId::new(4), "Topics course", CourseFormat::Topics)
            .with_sections(vec![
                Section::new(SectionId::new(10), 0),
                Section::new(SectionId::new(11), 1),
                Section::new(SectionId::new(12), 2)
                    .with_activities(vec![Activity::new(ModuleId::new(3), "page", "Leftover")]),
                Section::new(SectionId::new(13), 3),
            ])
            .with_last_section_number(1);
        let viewer = Viewer::teacher(UserId::new(1));
        let options = DisplayOptions::default();
        let request = PageRequest::new(&course, &viewer, &options).with_editing(true);
        let composer = TopicsComposer::new(&site());

        let ctx = composer.compose_overview(&request).await.unwrap();
        let editing = ctx.editing_sections.unwrap();
        let numbers: Vec<u32> = editing.iter().map(|s| s.number).collect();
        // Section 3 is past the last one but empty, so it stays out.
        assert_eq!(numbers, vec![1, 2]);
        assert!(!editing[0].stealth);
        assert!(editing[1].stealth);
        assert_eq!(editing[1].activities.len(), 1);

        let student = Viewer::student(UserId::new(5));
        let request = PageRequest::new(&course, &student, &options).with_editing(true);
        let ctx = composer.compose_overview(&request).await.unwrap();
        assert!(ctx.editing_sections.is_none());
    }
}
