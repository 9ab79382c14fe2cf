//! Canonical links into the host application.

use url::Url;

use crate::config::SiteConfig;
use crate::model::{CourseId, ModuleId, SectionId};

/// Builds absolute host URLs relative to the configured site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseUrls {
    root: Url,
}

impl CourseUrls {
    #[must_use]
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            root: site.wwwroot().clone(),
        }
    }

    fn page(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.root.clone();
        // The root is validated as a base URL, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(path.split('/'));
        }
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    /// Course page, or one section of it when `section` is given.
    #[must_use]
    pub fn course_view(&self, course: CourseId, section: Option<u32>) -> Url {
        let mut params = vec![("id", course.to_string())];
        if let Some(number) = section {
            params.push(("section", number.to_string()));
        }
        self.page("course/view.php", &params)
    }

    #[must_use]
    pub fn completion_report(&self, course: CourseId) -> Url {
        self.page(
            "report/completion/index.php",
            &[("course", course.to_string())],
        )
    }

    #[must_use]
    pub fn completion_settings(&self, course: CourseId) -> Url {
        self.page("course/completion.php", &[("id", course.to_string())])
    }

    #[must_use]
    pub fn edit_section(&self, section: SectionId, return_section: u32) -> Url {
        self.page(
            "course/editsection.php",
            &[("id", section.to_string()), ("sr", return_section.to_string())],
        )
    }

    #[must_use]
    pub fn add_activity(&self, course: CourseId, section: u32, return_section: u32) -> Url {
        self.page(
            "course/modedit.php",
            &[
                ("course", course.to_string()),
                ("section", section.to_string()),
                ("return", "0".to_owned()),
                ("sr", return_section.to_string()),
            ],
        )
    }

    /// Section action on the course page, e.g. `marker` or `hide`.
    #[must_use]
    pub fn section_action(&self, course: CourseId, action: &str, section: u32) -> Url {
        self.page(
            "course/view.php",
            &[("id", course.to_string()), (action, section.to_string())],
        )
    }

    /// View page of a course module, e.g. `/mod/quiz/view.php?id=4`.
    #[must_use]
    pub fn activity_view(&self, kind: &str, module: ModuleId) -> Url {
        self.page(
            &format!("mod/{kind}/view.php"),
            &[("id", module.to_string())],
        )
    }

    /// Resolve a site-relative path such as `/mod/page/view.php`.
    #[must_use]
    pub fn site_path(&self, path: &str) -> Url {
        self.page(path.trim_start_matches('/'), &[])
    }

    #[must_use]
    pub fn root(&self) -> &Url {
        &self.root
    }
}
