use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;
use crate::strings::Locale;

/// Capability checks already evaluated by the host for the course context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    pub view_hidden_sections: bool,
    pub view_completion_stats: bool,
    pub update_course: bool,
    pub manage_activities: bool,
}

impl Capabilities {
    /// Capabilities of an editing teacher.
    #[must_use]
    pub fn teacher() -> Self {
        Self {
            view_hidden_sections: true,
            view_completion_stats: true,
            update_course: true,
            manage_activities: true,
        }
    }
}

/// The user a page is composed for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewer {
    /// `None` when nobody is logged in.
    pub user_id: Option<UserId>,
    pub guest: bool,
    pub locale: Locale,
    pub capabilities: Capabilities,
}

impl Viewer {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn guest() -> Self {
        Self {
            guest: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn student(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn teacher(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            capabilities: Capabilities::teacher(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Only logged-in, non-guest users have their activity completion counted.
    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.is_logged_in() && !self.guest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guests_and_anonymous_cannot_complete() {
        assert!(!Viewer::anonymous().can_complete());
        let mut guest = Viewer::guest();
        guest.user_id = Some(UserId::new(1));
        assert!(!guest.can_complete());
        assert!(Viewer::student(UserId::new(2)).can_complete());
    }
}
