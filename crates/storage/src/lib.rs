#![forbid(unsafe_code)]

pub mod image_cache;
pub mod repository;
pub mod sqlite;

pub use image_cache::{HeaderImageCache, ImageCacheKey, InMemoryImageCache};
pub use repository::{
    FormatOptionRecord, FormatOptionRepository, InMemoryRepository, Storage, StorageError,
    StoredOptions, UserPreferenceRepository,
};
