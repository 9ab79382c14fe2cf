use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use twocol_core::model::{CourseId, SectionId, UserId};

use crate::image_cache::{HeaderImageCache, InMemoryImageCache};

/// Format name stored alongside every option row.
pub const FORMAT_NAME: &str = "twocol";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// One persisted format option.
///
/// `section_id` is `None` for course-level options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptionRecord {
    pub course_id: CourseId,
    pub section_id: Option<SectionId>,
    pub name: String,
    pub value: Option<String>,
}

/// Stored option values of one course grouped by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredOptions {
    pub course: BTreeMap<String, String>,
    pub sections: BTreeMap<SectionId, BTreeMap<String, String>>,
}

impl StoredOptions {
    /// Group raw rows; rows with a `NULL` value are skipped.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = FormatOptionRecord>) -> Self {
        let mut stored = Self::default();
        for record in records {
            let Some(value) = record.value else {
                continue;
            };
            match record.section_id {
                None => {
                    stored.course.insert(record.name, value);
                }
                Some(section) => {
                    stored
                        .sections
                        .entry(section)
                        .or_default()
                        .insert(record.name, value);
                }
            }
        }
        stored
    }
}

/// Repository contract for per-course format options.
#[async_trait]
pub trait FormatOptionRepository: Send + Sync {
    /// Load every option row of a course, course-level and per-section.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read.
    async fn load_options(&self, course: CourseId) -> Result<Vec<FormatOptionRecord>, StorageError>;

    /// Insert or replace the given values; other stored names are untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the values cannot be stored.
    async fn save_options(
        &self,
        course: CourseId,
        section: Option<SectionId>,
        values: &BTreeMap<String, String>,
    ) -> Result<(), StorageError>;

    /// Remove every option of a section, e.g. after the section is deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be removed.
    async fn delete_section_options(
        &self,
        course: CourseId,
        section: SectionId,
    ) -> Result<(), StorageError>;
}

/// Repository contract for per-user preferences.
#[async_trait]
pub trait UserPreferenceRepository: Send + Sync {
    /// Fetch a preference value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing preference is `Ok(None)`.
    async fn get_preference(&self, user: UserId, name: &str)
    -> Result<Option<String>, StorageError>;

    /// Insert or replace a preference value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_preference(
        &self,
        user: UserId,
        name: &str,
        value: &str,
    ) -> Result<(), StorageError>;
}

type OptionKey = (CourseId, Option<SectionId>, String);

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    options: Arc<Mutex<BTreeMap<OptionKey, String>>>,
    preferences: Arc<Mutex<HashMap<(UserId, String), String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormatOptionRepository for InMemoryRepository {
    async fn load_options(&self, course: CourseId) -> Result<Vec<FormatOptionRecord>, StorageError> {
        let guard = self
            .options
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|((c, _, _), _)| *c == course)
            .map(|((course_id, section_id, name), value)| FormatOptionRecord {
                course_id: *course_id,
                section_id: *section_id,
                name: name.clone(),
                value: Some(value.clone()),
            })
            .collect())
    }

    async fn save_options(
        &self,
        course: CourseId,
        section: Option<SectionId>,
        values: &BTreeMap<String, String>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .options
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (name, value) in values {
            guard.insert((course, section, name.clone()), value.clone());
        }
        Ok(())
    }

    async fn delete_section_options(
        &self,
        course: CourseId,
        section: SectionId,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .options
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.retain(|(c, s, _), _| !(*c == course && *s == Some(section)));
        Ok(())
    }
}

#[async_trait]
impl UserPreferenceRepository for InMemoryRepository {
    async fn get_preference(
        &self,
        user: UserId,
        name: &str,
    ) -> Result<Option<String>, StorageError> {
        let guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(user, name.to_owned())).cloned())
    }

    async fn set_preference(
        &self,
        user: UserId,
        name: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((user, name.to_owned()), value.to_owned());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub options: Arc<dyn FormatOptionRepository>,
    pub preferences: Arc<dyn UserPreferenceRepository>,
    pub images: Arc<dyn HeaderImageCache>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let options: Arc<dyn FormatOptionRepository> = Arc::new(repo.clone());
        let preferences: Arc<dyn UserPreferenceRepository> = Arc::new(repo);
        let images: Arc<dyn HeaderImageCache> = Arc::new(InMemoryImageCache::new());
        Self {
            options,
            preferences,
            images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn saves_and_groups_options_by_scope() {
        let repo = InMemoryRepository::new();
        let course = CourseId::new(3);
        let section = SectionId::new(30);
        repo.save_options(course, None, &values(&[("headerimage", "2")]))
            .await
            .unwrap();
        repo.save_options(course, Some(section), &values(&[("sectionimage", "4")]))
            .await
            .unwrap();
        repo.save_options(CourseId::new(4), None, &values(&[("headerimage", "9")]))
            .await
            .unwrap();

        let stored = StoredOptions::from_records(repo.load_options(course).await.unwrap());
        assert_eq!(stored.course, values(&[("headerimage", "2")]));
        assert_eq!(stored.sections[&section], values(&[("sectionimage", "4")]));
    }

    #[tokio::test]
    async fn save_overwrites_only_given_names() {
        let repo = InMemoryRepository::new();
        let course = CourseId::new(1);
        repo.save_options(
            course,
            None,
            &values(&[("detailsheading", "Summary"), ("reversedisplay", "0")]),
        )
        .await
        .unwrap();
        repo.save_options(course, None, &values(&[("reversedisplay", "1")]))
            .await
            .unwrap();

        let stored = StoredOptions::from_records(repo.load_options(course).await.unwrap());
        assert_eq!(stored.course["detailsheading"], "Summary");
        assert_eq!(stored.course["reversedisplay"], "1");
    }

    #[tokio::test]
    async fn delete_section_options_keeps_course_level() {
        let repo = InMemoryRepository::new();
        let course = CourseId::new(1);
        let section = SectionId::new(10);
        repo.save_options(course, None, &values(&[("headerimage", "1")]))
            .await
            .unwrap();
        repo.save_options(course, Some(section), &values(&[("sectionimage", "3")]))
            .await
            .unwrap();
        repo.delete_section_options(course, section).await.unwrap();

        let records = repo.load_options(course).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section_id, None);
    }

    #[tokio::test]
    async fn preferences_are_per_user() {
        let repo = InMemoryRepository::new();
        repo.set_preference(UserId::new(1), "k", "a").await.unwrap();
        repo.set_preference(UserId::new(2), "k", "b").await.unwrap();
        assert_eq!(
            repo.get_preference(UserId::new(1), "k").await.unwrap(),
            Some("a".to_owned())
        );
        assert_eq!(repo.get_preference(UserId::new(3), "k").await.unwrap(), None);
    }

    #[test]
    fn null_values_are_skipped() {
        let stored = StoredOptions::from_records([FormatOptionRecord {
            course_id: CourseId::new(1),
            section_id: None,
            name: "headerimage".into(),
            value: None,
        }]);
        assert!(stored.course.is_empty());
    }
}
