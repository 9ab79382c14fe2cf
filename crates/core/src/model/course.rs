use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, ModuleId, SectionId};
use crate::model::options::RichText;
use crate::strings::Strings;

/// Which page composer a course is displayed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseFormat {
    /// Plain topic list.
    Topics,
    /// Two-column layout with header image and summary column.
    #[default]
    TwoCol,
}

/// Per-activity completion tracking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionTracking {
    #[default]
    None,
    Manual,
    Automatic,
}

impl CompletionTracking {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Completion state of one activity for the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    #[default]
    NotStarted,
    InProgress,
    Complete,
    CompletePass,
    CompleteFail,
}

impl CompletionState {
    /// Whether the state counts toward a section's completed activities.
    #[must_use]
    pub fn counts_as_complete(self) -> bool {
        matches!(self, Self::Complete | Self::CompletePass)
    }
}

/// A course module as seen by the current viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ModuleId,
    pub name: String,
    /// Module type, e.g. `page`, `quiz`.
    pub kind: String,
    pub visible: bool,
    pub user_visible: bool,
    pub tracking: CompletionTracking,
    pub state: CompletionState,
}

impl Activity {
    #[must_use]
    pub fn new(id: ModuleId, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            visible: true,
            user_visible: true,
            tracking: CompletionTracking::None,
            state: CompletionState::NotStarted,
        }
    }

    #[must_use]
    pub fn tracked(mut self, tracking: CompletionTracking, state: CompletionState) -> Self {
        self.tracking = tracking;
        self.state = state;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self.user_visible = false;
        self
    }
}

/// A numbered grouping of activities within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub number: u32,
    /// User-set name; empty means the default name applies.
    pub name: String,
    pub summary: RichText,
    pub visible: bool,
    /// Computed by the host for the current viewer.
    pub user_visible: bool,
    pub available: bool,
    pub availability_info: Option<String>,
    pub activities: Vec<Activity>,
}

impl Section {
    #[must_use]
    pub fn new(id: SectionId, number: u32) -> Self {
        Self {
            id,
            number,
            name: String::new(),
            summary: RichText::default(),
            visible: true,
            user_visible: true,
            available: true,
            availability_info: None,
            activities: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    /// Name shown to users: the user-set name, else the localized default.
    #[must_use]
    pub fn display_name(&self, strings: &Strings) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            strings.default_section_name(self.number)
        } else {
            name.to_owned()
        }
    }

    #[must_use]
    pub fn has_availability_info(&self) -> bool {
        self.availability_info
            .as_deref()
            .is_some_and(|info| !info.trim().is_empty())
    }
}

/// A course and its sections, read once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub full_name: String,
    pub format: CourseFormat,
    /// Highest configured section number; sections above it are orphaned.
    pub last_section_number: u32,
    /// Highlighted section number, `0` when none is highlighted.
    pub marker: u32,
    /// Ordered by section number.
    pub sections: Vec<Section>,
}

impl Course {
    #[must_use]
    pub fn new(id: CourseId, full_name: impl Into<String>, format: CourseFormat) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            format,
            last_section_number: 0,
            marker: 0,
            sections: Vec::new(),
        }
    }

    /// Replace the sections, keeping them ordered by number.
    ///
    /// The last section number becomes the highest number supplied.
    #[must_use]
    pub fn with_sections(mut self, mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.number);
        self.last_section_number = sections.last().map_or(0, |s| s.number);
        self.sections = sections;
        self
    }

    #[must_use]
    pub fn with_last_section_number(mut self, last: u32) -> Self {
        self.last_section_number = last;
        self
    }

    #[must_use]
    pub fn is_highlighted(&self, number: u32) -> bool {
        number != 0 && self.marker == number
    }

    #[must_use]
    pub fn section(&self, number: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    /// The general section, if the host supplied it.
    #[must_use]
    pub fn general_section(&self) -> Option<&Section> {
        self.section(0)
    }

    /// Sections `1..=last_section_number`, in order.
    pub fn numbered_sections(&self) -> impl Iterator<Item = &Section> {
        let last = self.last_section_number;
        self.sections
            .iter()
            .filter(move |s| s.number > 0 && s.number <= last)
    }

    /// Sections past the last numbered one that still hold activities.
    pub fn orphaned_sections(&self) -> impl Iterator<Item = &Section> {
        let last = self.last_section_number;
        self.sections
            .iter()
            .filter(move |s| s.number > last && !s.activities.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::Locale;

    fn section(number: u32) -> Section {
        Section::new(SectionId::new(100 + u64::from(number)), number)
    }

    #[test]
    fn display_name_prefers_user_name() {
        let strings = Locale::En.strings();
        assert_eq!(section(2).display_name(strings), "Topic 2");
        assert_eq!(section(0).display_name(strings), "Overview");
        assert_eq!(
            section(2).named("  Week two  ").display_name(strings),
            "Week two"
        );
    }

    #[test]
    fn with_sections_orders_and_sets_last() {
        let course = Course::new(CourseId::new(1), "C", CourseFormat::TwoCol)
            .with_sections(vec![section(3), section(0), section(1)]);
        let numbers: Vec<u32> = course.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![0, 1, 3]);
        assert_eq!(course.last_section_number, 3);
    }

    #[test]
    fn numbered_sections_skip_general_and_orphans() {
        let course = Course::new(CourseId::new(1), "C", CourseFormat::TwoCol)
            .with_sections(vec![section(0), section(1), section(2), section(3)])
            .with_last_section_number(2);
        let numbers: Vec<u32> = course.numbered_sections().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn orphaned_sections_need_activities() {
        let course = Course::new(CourseId::new(1), "C", CourseFormat::TwoCol)
            .with_sections(vec![
                section(0),
                section(1),
                section(2).with_activities(vec![Activity::new(ModuleId::new(7), "page", "Old")]),
                section(3),
            ])
            .with_last_section_number(1);
        let numbers: Vec<u32> = course.orphaned_sections().map(|s| s.number).collect();
        assert_eq!(numbers, vec![2]);
    }

    #[test]
    fn completion_states_that_count() {
        assert!(CompletionState::Complete.counts_as_complete());
        assert!(CompletionState::CompletePass.counts_as_complete());
        assert!(!CompletionState::CompleteFail.counts_as_complete());
        assert!(!CompletionState::InProgress.counts_as_complete());
    }

    #[test]
    fn blank_availability_info_is_not_info() {
        let mut s = section(1);
        s.availability_info = Some("   ".into());
        assert!(!s.has_availability_info());
        s.availability_info = Some("Available from Monday".into());
        assert!(s.has_availability_info());
    }
}
