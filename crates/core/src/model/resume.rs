use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ids::CourseId;

/// Kind of page a view was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLevel {
    Course,
    Module,
    Other,
}

/// Last `view.php` page a user visited in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub anchor: Option<String>,
}

impl ResumePoint {
    /// Capture a resume point from a page URL.
    ///
    /// Only `view.php` pages are worth resuming; anything else yields `None`.
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        let path = url.path();
        if !path.contains("view.php") {
            return None;
        }
        Some(Self {
            path: path.to_owned(),
            params: url.query_pairs().into_owned().collect(),
            anchor: url.fragment().map(str::to_owned),
        })
    }

    /// Rebuild the absolute URL on the given site.
    #[must_use]
    pub fn to_url(&self, root: &Url) -> Url {
        let mut url = root.clone();
        url.set_path(&self.path);
        url.set_query(None);
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        url.set_fragment(self.anchor.as_deref());
        url
    }

    /// User preference key the resume point is stored under.
    #[must_use]
    pub fn preference_name(course: CourseId) -> String {
        format!("format_twocol_resume_courseid_{course}")
    }
}
