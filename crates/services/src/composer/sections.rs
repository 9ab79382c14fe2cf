//! Section visibility, navigation neighbours and jump targets.

use twocol_core::model::{Course, CourseOptions, HiddenSections, Section, Viewer};

/// Whether a numbered section appears in the overview's section list.
///
/// Section 0 and orphaned sections (beyond the last configured number) never
/// appear. Otherwise a section is listed when the viewer can see it, when it
/// is visible but restricted and has availability info to show, or when it
/// is hidden and the course shows hidden sections collapsed.
#[must_use]
pub fn is_listed(section: &Section, last_section_number: u32, hidden: HiddenSections) -> bool {
    if section.number == 0 || section.number > last_section_number {
        return false;
    }
    section.user_visible
        || (section.visible && !section.available && section.has_availability_info())
        || (!section.visible && hidden.shows_placeholders())
}

/// Listed sections in ascending number order.
pub fn listed_sections<'a>(
    course: &'a Course,
    options: &CourseOptions,
) -> impl Iterator<Item = &'a Section> {
    let last = course.last_section_number;
    let hidden = options.hidden_sections;
    course
        .sections
        .iter()
        .filter(move |s| is_listed(s, last, hidden))
}

/// Hidden sections may be linked when the viewer has the capability or the
/// course shows them collapsed.
#[must_use]
pub fn can_view_hidden(viewer: &Viewer, options: &CourseOptions) -> bool {
    viewer.capabilities.view_hidden_sections || options.hidden_sections.shows_placeholders()
}

/// Nearest linkable sections before and after `current`.
///
/// The backward scan reaches section 0; the forward scan stops at the last
/// configured section.
#[must_use]
pub fn neighbours(
    course: &Course,
    current: u32,
    can_view_hidden: bool,
) -> (Option<&Section>, Option<&Section>) {
    let linkable = |n: u32| {
        course
            .section(n)
            .filter(|s| s.user_visible || can_view_hidden)
    };
    let previous = (0..current).rev().find_map(linkable);
    let next = current
        .checked_add(1)
        .and_then(|from| (from..=course.last_section_number).find_map(linkable));
    (previous, next)
}

/// Sections offered by the jump-to selector, excluding the current one.
pub fn jump_targets<'a>(
    course: &'a Course,
    current: u32,
    hidden: HiddenSections,
) -> impl Iterator<Item = &'a Section> {
    course
        .numbered_sections()
        .filter(move |s| s.number != current && (s.user_visible || hidden.shows_placeholders()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twocol_core::model::{CourseFormat, CourseId, SectionId, UserId};

    fn section(number: u32) -> Section {
        Section::new(SectionId::new(10 + u64::from(number)), number)
    }

    fn hidden(number: u32) -> Section {
        let mut s = section(number);
        s.visible = false;
        s.user_visible = false;
        s
    }

    fn course(sections: Vec<Section>, last: u32) -> Course {
        Course::new(CourseId::new(1), "Course", CourseFormat::TwoCol)
            .with_sections(sections)
            .with_last_section_number(last)
    }

    fn options(mode: HiddenSections) -> CourseOptions {
        CourseOptions::defaults(mode)
    }

    fn numbers<'a>(sections: impl Iterator<Item = &'a Section>) -> Vec<u32> {
        sections.map(|s| s.number).collect()
    }

    #[test]
    fn last_section_is_listed_and_orphans_are_not() {
        let course = course((0..=6).map(section).collect(), 5);
        let listed = numbers(listed_sections(&course, &options(HiddenSections::Invisible)));
        assert_eq!(listed, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn hidden_orphan_without_info_is_excluded() {
        let course = course(vec![section(0), section(1), hidden(7)], 5);
        assert!(!is_listed(
            course.section(7).unwrap(),
            course.last_section_number,
            HiddenSections::Collapsed
        ));
    }

    #[test]
    fn hidden_sections_follow_course_mode() {
        let course = course(vec![section(0), section(1), hidden(2)], 2);
        assert_eq!(
            numbers(listed_sections(&course, &options(HiddenSections::Collapsed))),
            vec![1, 2]
        );
        assert_eq!(
            numbers(listed_sections(&course, &options(HiddenSections::Invisible))),
            vec![1]
        );
    }

    #[test]
    fn restricted_section_with_info_is_listed() {
        let mut restricted = section(1);
        restricted.user_visible = false;
        restricted.available = false;
        restricted.availability_info = Some("Not available until Monday".into());
        assert!(is_listed(&restricted, 3, HiddenSections::Invisible));

        restricted.availability_info = None;
        assert!(!is_listed(&restricted, 3, HiddenSections::Invisible));
    }

    #[test]
    fn listing_is_stable() {
        let course = course((0..=4).map(section).collect(), 4);
        let opts = options(HiddenSections::Collapsed);
        assert_eq!(
            numbers(listed_sections(&course, &opts)),
            numbers(listed_sections(&course, &opts))
        );
    }

    #[test]
    fn neighbours_skip_invisible_sections() {
        let course = course(
            vec![section(0), section(1), hidden(2), section(3), hidden(4), section(5)],
            5,
        );
        let (prev, next) = neighbours(&course, 3, false);
        assert_eq!(prev.map(|s| s.number), Some(1));
        assert_eq!(next.map(|s| s.number), Some(5));

        let (prev, next) = neighbours(&course, 3, true);
        assert_eq!(prev.map(|s| s.number), Some(2));
        assert_eq!(next.map(|s| s.number), Some(4));
    }

    #[test]
    fn neighbours_reach_general_but_not_orphans() {
        let course = course((0..=3).map(section).collect(), 2);
        let (prev, next) = neighbours(&course, 1, false);
        assert_eq!(prev.map(|s| s.number), Some(0));
        assert_eq!(next.map(|s| s.number), Some(2));
        let (_, next) = neighbours(&course, 2, false);
        assert!(next.is_none());
    }

    #[test]
    fn capability_or_collapsed_mode_allows_hidden_links() {
        let student = Viewer::student(UserId::new(1));
        let teacher = Viewer::teacher(UserId::new(2));
        assert!(!can_view_hidden(&student, &options(HiddenSections::Invisible)));
        assert!(can_view_hidden(&student, &options(HiddenSections::Collapsed)));
        assert!(can_view_hidden(&teacher, &options(HiddenSections::Invisible)));
    }

    #[test]
    fn jump_targets_exclude_current() {
        let course = course(vec![section(0), section(1), hidden(2), section(3)], 3);
        assert_eq!(
            numbers(jump_targets(&course, 1, HiddenSections::Invisible)),
            vec![3]
        );
        assert_eq!(
            numbers(jump_targets(&course, 1, HiddenSections::Collapsed)),
            vec![2, 3]
        );
    }
}
