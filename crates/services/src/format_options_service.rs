use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use storage::repository::{FormatOptionRepository, StoredOptions};
use twocol_core::model::options::{validate_values, OptionScope};
use twocol_core::model::{
    CourseId, CourseOptions, DisplayOptions, HiddenSections, SectionId, SectionOptions,
};
use twocol_core::SiteConfig;

use crate::error::FormatOptionsError;

/// Loads, validates and persists per-course display options.
///
/// Loaded options are memoized per course for the life of the service, so
/// one instance should serve one request.
pub struct FormatOptionsService {
    site_default: HiddenSections,
    repo: Arc<dyn FormatOptionRepository>,
    loaded: Mutex<HashMap<CourseId, Arc<DisplayOptions>>>,
}

impl FormatOptionsService {
    #[must_use]
    pub fn new(site: &SiteConfig, repo: Arc<dyn FormatOptionRepository>) -> Self {
        Self {
            site_default: site.default_hidden_sections(),
            repo,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    fn memoized(&self, course: CourseId) -> Option<Arc<DisplayOptions>> {
        self.loaded
            .lock()
            .ok()
            .and_then(|guard| guard.get(&course).cloned())
    }

    fn remember(&self, course: CourseId, options: &Arc<DisplayOptions>) {
        if let Ok(mut guard) = self.loaded.lock() {
            guard.insert(course, Arc::clone(options));
        }
    }

    /// Drop the memoized options of a course.
    pub fn invalidate(&self, course: CourseId) {
        if let Ok(mut guard) = self.loaded.lock() {
            guard.remove(&course);
        }
    }

    /// Typed options of a course, with defaults for anything not stored.
    ///
    /// # Errors
    ///
    /// Returns `FormatOptionsError::Storage` if the stored options cannot be read.
    pub async fn load(&self, course: CourseId) -> Result<Arc<DisplayOptions>, FormatOptionsError> {
        if let Some(options) = self.memoized(course) {
            return Ok(options);
        }
        let stored = StoredOptions::from_records(self.repo.load_options(course).await?);
        let mut options = DisplayOptions::new(CourseOptions::from_stored(
            &stored.course,
            self.site_default,
        ));
        options.sections = stored
            .sections
            .iter()
            .map(|(section, values)| (*section, SectionOptions::from_stored(values)))
            .collect();
        tracing::debug!(%course, sections = options.sections.len(), "loaded format options");

        let options = Arc::new(options);
        self.remember(course, &options);
        Ok(options)
    }

    /// Clean submitted values of one scope into their stored form.
    #[must_use]
    pub fn validate(scope: OptionScope, raw: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
        validate_values(scope, raw)
    }

    /// Persist submitted course options.
    ///
    /// Names missing from `raw` keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `FormatOptionsError::Storage` if options cannot be read or stored.
    pub async fn update_course_options(
        &self,
        course: CourseId,
        raw: &BTreeMap<String, Value>,
    ) -> Result<Arc<DisplayOptions>, FormatOptionsError> {
        let previous = self.load(course).await?.course.to_stored();
        let values = Self::validate(OptionScope::Course, &merge_previous(raw, previous));
        self.repo.save_options(course, None, &values).await?;
        self.invalidate(course);
        tracing::debug!(%course, count = values.len(), "updated course format options");
        self.load(course).await
    }

    /// Persist submitted options of one section.
    ///
    /// # Errors
    ///
    /// Returns `FormatOptionsError::Storage` if options cannot be read or stored.
    pub async fn update_section_options(
        &self,
        course: CourseId,
        section: SectionId,
        raw: &BTreeMap<String, Value>,
    ) -> Result<Arc<DisplayOptions>, FormatOptionsError> {
        let previous = self
            .load(course)
            .await?
            .sections
            .get(&section)
            .map(SectionOptions::to_stored)
            .unwrap_or_default();
        let values = Self::validate(OptionScope::Section, &merge_previous(raw, previous));
        self.repo.save_options(course, Some(section), &values).await?;
        self.invalidate(course);
        self.load(course).await
    }

    /// Every course option in stored form, for external consumers.
    ///
    /// # Errors
    ///
    /// Returns `FormatOptionsError::Storage` if the stored options cannot be read.
    pub async fn config_for_external(
        &self,
        course: CourseId,
    ) -> Result<BTreeMap<String, String>, FormatOptionsError> {
        Ok(self.load(course).await?.course.to_stored())
    }
}

fn merge_previous(
    raw: &BTreeMap<String, Value>,
    previous: BTreeMap<String, String>,
) -> BTreeMap<String, Value> {
    let mut merged = raw.clone();
    for (name, value) in previous {
        merged.entry(name).or_insert(Value::String(value));
    }
    merged
}
