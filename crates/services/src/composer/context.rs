//! Template contexts produced by the composers.

use serde::{Serialize, Serializer};
use url::Url;

use twocol_core::model::{
    CompletionState, CompletionSummary, ImageFormat, ModuleId, SectionCompletion, SummaryIcon,
};

use crate::image::HeaderImage;

/// One activity in a section's module list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub id: ModuleId,
    pub name: String,
    pub kind: String,
    pub url: Url,
    pub dimmed: bool,
    /// Present only for activities with completion tracking.
    pub completion: Option<CompletionState>,
}

/// Section-level actions offered in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionAction {
    Edit,
    Highlight,
    Unhighlight,
    Hide,
    Show,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlMenuItem {
    pub action: SectionAction,
    pub url: Url,
}

/// Edit-control menu of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlMenu {
    pub section: u32,
    pub items: Vec<ControlMenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddActivityControl {
    pub section: u32,
    pub url: Url,
}

/// A numbered section in the overview's section list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionListItem {
    pub number: u32,
    pub name: String,
    pub url: Url,
    pub dimmed: bool,
    pub current: bool,
    pub availability_info: Option<String>,
    /// Filled by composers that track completion.
    pub completion: Option<SectionCompletion>,
}

/// A section as listed in edit mode, with its controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditingSection {
    pub number: u32,
    pub name: String,
    pub url: Url,
    pub visible: bool,
    /// Orphaned section past the last numbered one, shown only to editors.
    pub stealth: bool,
    pub summary: String,
    pub activities: Vec<ActivityItem>,
    pub control_menu: ControlMenu,
    pub add_activity: AddActivityControl,
}

/// Heading, icon and text of one summary slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryItem {
    /// 1-based slot number.
    pub slot: usize,
    pub heading: String,
    pub icon: Option<SummaryIcon>,
    pub text: Option<String>,
}

/// Labelled completion counts for the statistics panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionCountsView {
    #[serde(flatten)]
    pub summary: CompletionSummary,
    pub complete_label: String,
    pub inprogress_label: String,
    pub notstarted_label: String,
}

/// Completion statistics, or `false` when they are not shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompletionCounts {
    Shown(CompletionCountsView),
    #[default]
    Hidden,
}

impl CompletionCounts {
    #[must_use]
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown(_))
    }
}

impl Serialize for CompletionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Shown(view) => view.serialize(serializer),
            Self::Hidden => serializer.serialize_bool(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// HTML message.
    pub message: String,
}

/// Previous or next section link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub number: u32,
    /// Direction prefix, e.g. "Previous:".
    pub label: String,
    pub name: String,
    pub url: Url,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpOption {
    pub label: String,
    pub url: Url,
}

/// Jump-to selector of the single-section page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpMenu {
    pub prompt: String,
    pub options: Vec<JumpOption>,
}

/// Link back to the course home.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseLink {
    pub url: Url,
    pub label: String,
    pub title: String,
}

/// Context of the course overview (summary column plus section list).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewContext {
    pub course_name: String,
    pub summary_name: String,
    pub summary: String,
    pub activities: Vec<ActivityItem>,
    pub add_activity: Option<AddActivityControl>,
    pub control_menu: Option<ControlMenu>,
    pub sections: Vec<SectionListItem>,
    /// Present only in edit mode.
    pub editing_sections: Option<Vec<EditingSection>>,
    pub header_image: Option<HeaderImage>,
    pub header_back_color: Option<String>,
    pub header_image_format: Option<ImageFormat>,
    pub progress_title: String,
    pub has_progress: bool,
    pub progress: Option<u32>,
    pub details_heading: Option<String>,
    pub resources_heading: Option<String>,
    pub summary_items: Vec<SummaryItem>,
    pub completion_counts: CompletionCounts,
    pub completion_url: Option<Url>,
    pub notice: Option<Notice>,
    pub reverse_display: bool,
}

/// Context of a single-section page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionContext {
    pub number: u32,
    pub name: String,
    pub summary: String,
    pub dimmed: bool,
    pub availability_info: Option<String>,
    pub activities: Vec<ActivityItem>,
    pub add_activity: Option<AddActivityControl>,
    pub control_menu: Option<ControlMenu>,
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
    pub jump_menu: JumpMenu,
    pub course_link: CourseLink,
    pub completion: Option<SectionCompletion>,
    pub header_image: Option<HeaderImage>,
    pub header_back_color: Option<String>,
    pub section_image_format: Option<ImageFormat>,
    pub progress_title: String,
    pub has_progress: bool,
    pub progress: Option<u32>,
}

/// Either page shape, as selected by the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageContext {
    Overview(Box<OverviewContext>),
    SingleSection(Box<SectionContext>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_completion_counts_serialize_as_false() {
        let json = serde_json::to_value(CompletionCounts::Hidden).unwrap();
        assert_eq!(json, serde_json::Value::Bool(false));
    }

    #[test]
    fn shown_completion_counts_are_flat() {
        let counts = CompletionCounts::Shown(CompletionCountsView {
            summary: CompletionSummary {
                complete: 1,
                inprogress: 1,
                notstarted: 2,
            },
            complete_label: "Students complete".into(),
            inprogress_label: "Students in progress".into(),
            notstarted_label: "Students not started".into(),
        });
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["complete"], 1);
        assert_eq!(json["notstarted"], 2);
        assert_eq!(json["complete_label"], "Students complete");
    }
}
