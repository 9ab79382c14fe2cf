use serde::{Deserialize, Serialize};

/// Icon shown next to a summary item heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryIcon {
    Report,
    Notifications,
    Calc,
    Calendar,
    Duration,
    Email,
    Siteevent,
    Info,
    New,
    Stats,
    Payment,
    News,
    Grades,
    Groupn,
    Group,
    Questions,
    Dashboard,
    StarRating,
    Checked,
}

impl SummaryIcon {
    pub const ALL: [Self; 19] = [
        Self::Report,
        Self::Notifications,
        Self::Calc,
        Self::Calendar,
        Self::Duration,
        Self::Email,
        Self::Siteevent,
        Self::Info,
        Self::New,
        Self::Stats,
        Self::Payment,
        Self::News,
        Self::Grades,
        Self::Groupn,
        Self::Group,
        Self::Questions,
        Self::Dashboard,
        Self::StarRating,
        Self::Checked,
    ];

    /// Stored option value and pix icon key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Notifications => "notifications",
            Self::Calc => "calc",
            Self::Calendar => "calendar",
            Self::Duration => "duration",
            Self::Email => "email",
            Self::Siteevent => "siteevent",
            Self::Info => "info",
            Self::New => "new",
            Self::Stats => "stats",
            Self::Payment => "payment",
            Self::News => "news",
            Self::Grades => "grades",
            Self::Groupn => "groupn",
            Self::Group => "group",
            Self::Questions => "questions",
            Self::Dashboard => "dashboard",
            Self::StarRating => "star-rating",
            Self::Checked => "checked",
        }
    }

    /// English label for the settings form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Report => "Area Chart",
            Self::Notifications => "Bell",
            Self::Calc => "Calculator",
            Self::Calendar => "Calendar",
            Self::Duration => "Clock",
            Self::Email => "Envelope",
            Self::Siteevent => "Globe",
            Self::Info => "Information",
            Self::New => "Lightning",
            Self::Stats => "Line Chart",
            Self::Payment => "Money",
            Self::News => "Newspaper",
            Self::Grades => "Open book",
            Self::Groupn => "Person",
            Self::Group => "People",
            Self::Questions => "Question mark",
            Self::Dashboard => "Speedometer",
            Self::StarRating => "Star",
            Self::Checked => "Tick",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.key() == key)
    }

    /// Allowed values of the icon select element.
    #[must_use]
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|icon| icon.key()).collect()
    }
}
