use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::course::{Activity, Section};
use crate::model::ids::UserId;
use crate::model::viewer::Viewer;

/// Course completion progress of one tracked user.
///
/// Holds the host's epoch-second columns, where `0` (or less) means "never".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCompletionRecord {
    pub user_id: UserId,
    pub time_started: i64,
    pub time_completed: i64,
}

impl CourseCompletionRecord {
    #[must_use]
    pub fn from_timestamps(user_id: UserId, time_started: i64, time_completed: i64) -> Self {
        Self {
            user_id,
            time_started,
            time_completed,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        crate::time::timestamp_or_none(self.time_started)
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        crate::time::timestamp_or_none(self.time_completed)
    }

    #[must_use]
    pub fn status(&self) -> CompletionStatus {
        if self.time_completed > 0 {
            CompletionStatus::Complete
        } else if self.time_started > 0 {
            CompletionStatus::InProgress
        } else {
            CompletionStatus::NotStarted
        }
    }
}

/// Bucket a tracked user falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Complete,
    InProgress,
    NotStarted,
}

/// How many tracked users are complete, in progress, or not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub complete: u32,
    pub inprogress: u32,
    pub notstarted: u32,
}

impl CompletionSummary {
    /// Classify every tracked user into exactly one bucket.
    #[must_use]
    pub fn from_records(records: &[CourseCompletionRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut summary, record| {
                match record.status() {
                    CompletionStatus::Complete => summary.complete += 1,
                    CompletionStatus::InProgress => summary.inprogress += 1,
                    CompletionStatus::NotStarted => summary.notstarted += 1,
                }
                summary
            })
    }

    #[must_use]
    pub fn tracked(&self) -> u32 {
        self.complete + self.inprogress + self.notstarted
    }
}

/// Activity completion within one section for the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionCompletion {
    pub total: u32,
    pub complete: u32,
    pub has_total: bool,
    pub percent: u32,
}

impl SectionCompletion {
    #[must_use]
    pub fn for_section(section: &Section, viewer: &Viewer) -> Self {
        Self::from_activities(&section.activities, viewer)
    }

    /// Count user-visible, tracked activities; nothing is counted for guests
    /// or anonymous viewers.
    #[must_use]
    pub fn from_activities(activities: &[Activity], viewer: &Viewer) -> Self {
        if !viewer.can_complete() {
            return Self::default();
        }
        let (total, complete) = activities
            .iter()
            .filter(|a| a.user_visible && a.tracking.is_enabled())
            .fold((0_u32, 0_u32), |(total, complete), a| {
                (total + 1, complete + u32::from(a.state.counts_as_complete()))
            });
        Self::from_counts(total, complete)
    }

    #[must_use]
    pub fn from_counts(total: u32, complete: u32) -> Self {
        if total == 0 {
            return Self {
                total,
                complete,
                has_total: false,
                percent: 0,
            };
        }
        // complete <= total, so the ratio is within 0..=100.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (f64::from(complete) / f64::from(total) * 100.0).round() as u32;
        Self {
            total,
            complete,
            has_total: true,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::{CompletionState, CompletionTracking};
    use crate::model::ids::ModuleId;
    use crate::time::{FIXED_TEST_TIMESTAMP, fixed_now};

    fn tracked(id: u64, state: CompletionState) -> Activity {
        Activity::new(ModuleId::new(id), "page", format!("Page {id}"))
            .tracked(CompletionTracking::Automatic, state)
    }

    fn learner() -> Viewer {
        Viewer::student(UserId::new(5))
    }

    #[test]
    fn untracked_activities_have_no_total() {
        let activities = vec![
            Activity::new(ModuleId::new(1), "page", "A"),
            Activity::new(ModuleId::new(2), "url", "B"),
        ];
        let completion = SectionCompletion::from_activities(&activities, &learner());
        assert!(!completion.has_total);
        assert_eq!(completion.percent, 0);
        assert_eq!(completion.total, 0);
    }

    #[test]
    fn two_of_five_complete_is_forty_percent() {
        let activities = vec![
            tracked(1, CompletionState::Complete),
            tracked(2, CompletionState::CompletePass),
            tracked(3, CompletionState::CompleteFail),
            tracked(4, CompletionState::InProgress),
            tracked(5, CompletionState::NotStarted),
        ];
        let completion = SectionCompletion::from_activities(&activities, &learner());
        assert_eq!(
            completion,
            SectionCompletion {
                total: 5,
                complete: 2,
                has_total: true,
                percent: 40,
            }
        );
    }

    #[test]
    fn hidden_activities_are_ignored() {
        let activities = vec![
            tracked(1, CompletionState::Complete),
            tracked(2, CompletionState::Complete).hidden(),
            tracked(3, CompletionState::NotStarted),
        ];
        let completion = SectionCompletion::from_activities(&activities, &learner());
        assert_eq!(completion.total, 2);
        assert_eq!(completion.complete, 1);
        assert_eq!(completion.percent, 50);
    }

    #[test]
    fn guests_get_empty_completion() {
        let activities = vec![tracked(1, CompletionState::Complete)];
        let completion = SectionCompletion::from_activities(&activities, &Viewer::guest());
        assert!(!completion.has_total);
        assert_eq!(completion.total, 0);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(SectionCompletion::from_counts(3, 1).percent, 33);
        assert_eq!(SectionCompletion::from_counts(3, 2).percent, 67);
        assert_eq!(SectionCompletion::from_counts(8, 1).percent, 13);
    }

    #[test]
    fn nobody_started() {
        let records: Vec<_> = (1..=4)
            .map(|id| CourseCompletionRecord::from_timestamps(UserId::new(id), 0, 0))
            .collect();
        let summary = CompletionSummary::from_records(&records);
        assert_eq!(
            summary,
            CompletionSummary {
                complete: 0,
                inprogress: 0,
                notstarted: 4,
            }
        );
    }

    #[test]
    fn mixed_progress_sums_to_tracked_users() {
        let records = vec![
            CourseCompletionRecord::from_timestamps(UserId::new(1), 1_700_000_000, 0),
            CourseCompletionRecord::from_timestamps(UserId::new(2), 1_700_000_000, 1_700_100_000),
            CourseCompletionRecord::from_timestamps(UserId::new(3), 0, 0),
            CourseCompletionRecord::from_timestamps(UserId::new(4), 0, 0),
        ];
        let summary = CompletionSummary::from_records(&records);
        assert_eq!(summary.complete, 1);
        assert_eq!(summary.inprogress, 1);
        assert_eq!(summary.notstarted, 2);
        assert_eq!(summary.tracked() as usize, records.len());
    }

    #[test]
    fn completed_without_start_is_complete() {
        let record =
            CourseCompletionRecord::from_timestamps(UserId::new(1), 0, FIXED_TEST_TIMESTAMP);
        assert_eq!(record.status(), CompletionStatus::Complete);
        assert_eq!(record.started_at(), None);
        assert_eq!(record.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn status_ignores_unrepresentable_dates() {
        let record = CourseCompletionRecord::from_timestamps(UserId::new(1), i64::MAX, 0);
        assert_eq!(record.started_at(), None);
        assert_eq!(record.status(), CompletionStatus::InProgress);

        let record = CourseCompletionRecord::from_timestamps(UserId::new(2), 0, i64::MAX);
        assert_eq!(record.status(), CompletionStatus::Complete);
    }
}
