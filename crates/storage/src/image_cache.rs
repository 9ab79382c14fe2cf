use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use twocol_core::model::CourseId;

use crate::repository::StorageError;

/// Key of a cached header image: a course and an image index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageCacheKey {
    pub course: CourseId,
    pub index: u32,
}

impl ImageCacheKey {
    #[must_use]
    pub fn new(course: CourseId, index: u32) -> Self {
        Self { course, index }
    }
}

impl fmt::Display for ImageCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.course, self.index)
    }
}

/// Read-through cache of header image URLs.
///
/// A miss is `Ok(None)`; callers fall through to the next image source.
#[async_trait]
pub trait HeaderImageCache: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the cache backend is unavailable.
    async fn get(&self, key: ImageCacheKey) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the cache backend is unavailable.
    async fn set(&self, key: ImageCacheKey, url: String) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the cache backend is unavailable.
    async fn delete(&self, key: ImageCacheKey) -> Result<(), StorageError>;

    /// Drop every image index cached for a course, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cache backend is unavailable.
    async fn delete_course(&self, course: CourseId) -> Result<usize, StorageError>;
}

/// Process-local cache backed by a `HashMap`.
#[derive(Clone, Default)]
pub struct InMemoryImageCache {
    entries: Arc<Mutex<HashMap<ImageCacheKey, String>>>,
}

impl InMemoryImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HeaderImageCache for InMemoryImageCache {
    async fn get(&self, key: ImageCacheKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: ImageCacheKey, url: String) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, url);
        Ok(())
    }

    async fn delete(&self, key: ImageCacheKey) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }

    async fn delete_course(&self, course: CourseId) -> Result<usize, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|key, _| key.course != course);
        let removed = before - guard.len();
        tracing::debug!(%course, removed, "purged header image cache");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats_like_host_cache_ids() {
        assert_eq!(ImageCacheKey::new(CourseId::new(12), 0).to_string(), "12_0");
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = InMemoryImageCache::new();
        let key = ImageCacheKey::new(CourseId::new(1), 0);
        assert_eq!(cache.get(key).await.unwrap(), None);
        cache.set(key, "https://cdn.test/a.png".into()).await.unwrap();
        assert_eq!(
            cache.get(key).await.unwrap().as_deref(),
            Some("https://cdn.test/a.png")
        );
        cache.delete(key).await.unwrap();
        assert_eq!(cache.get(key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_course_keeps_other_courses() {
        let cache = InMemoryImageCache::new();
        for index in 0..3 {
            cache
                .set(ImageCacheKey::new(CourseId::new(1), index), format!("a{index}"))
                .await
                .unwrap();
        }
        cache
            .set(ImageCacheKey::new(CourseId::new(2), 0), "b".into())
            .await
            .unwrap();

        assert_eq!(cache.delete_course(CourseId::new(1)).await.unwrap(), 3);
        assert_eq!(
            cache
                .get(ImageCacheKey::new(CourseId::new(2), 0))
                .await
                .unwrap()
                .as_deref(),
            Some("b")
        );
    }
}
