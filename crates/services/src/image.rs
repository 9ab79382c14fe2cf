//! Header image resolution: cache, then course metadata, then a generated pattern.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

use storage::image_cache::{HeaderImageCache, ImageCacheKey};
use twocol_core::model::{Course, CourseId};

use crate::error::ComposeError;
use crate::host::CourseImageProvider;

/// Which tier of the fallback chain produced an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Cache,
    CourseMetadata,
    Generated,
}

/// A resolved header image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderImage {
    pub url: String,
    pub source: ImageSource,
}

/// One tier of the header image chain.
#[async_trait]
pub trait HeaderImageSource: Send + Sync {
    fn tier(&self) -> ImageSource;

    /// Look up an image for `(course, index)`; `Ok(None)` passes to the next tier.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError` if the backing collaborator fails.
    async fn lookup(&self, course: &Course, index: u32) -> Result<Option<String>, ComposeError>;
}

/// Custom header images stored per `(course, index)`.
///
/// An unavailable cache counts as a miss.
pub struct CachedImageSource {
    cache: Arc<dyn HeaderImageCache>,
}

impl CachedImageSource {
    #[must_use]
    pub fn new(cache: Arc<dyn HeaderImageCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HeaderImageSource for CachedImageSource {
    fn tier(&self) -> ImageSource {
        ImageSource::Cache
    }

    async fn lookup(&self, course: &Course, index: u32) -> Result<Option<String>, ComposeError> {
        match self.cache.get(ImageCacheKey::new(course.id, index)).await {
            Ok(url) => Ok(url.filter(|u| !u.is_empty())),
            Err(error) => {
                tracing::warn!(course = %course.id, index, %error, "header image cache unavailable");
                Ok(None)
            }
        }
    }
}

/// The image uploaded in the course's own settings.
///
/// A failing host lookup counts as no image.
pub struct MetadataImageSource {
    provider: Arc<dyn CourseImageProvider>,
}

impl MetadataImageSource {
    #[must_use]
    pub fn new(provider: Arc<dyn CourseImageProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl HeaderImageSource for MetadataImageSource {
    fn tier(&self) -> ImageSource {
        ImageSource::CourseMetadata
    }

    async fn lookup(&self, course: &Course, _index: u32) -> Result<Option<String>, ComposeError> {
        match self.provider.course_image(course).await {
            Ok(url) => Ok(url.filter(|u| !u.is_empty())),
            Err(error) => {
                tracing::warn!(course = %course.id, %error, "course image lookup failed");
                Ok(None)
            }
        }
    }
}

/// Placeholder generated from the course id; always answers.
pub struct GeneratedImageSource {
    provider: Arc<dyn CourseImageProvider>,
}

impl GeneratedImageSource {
    #[must_use]
    pub fn new(provider: Arc<dyn CourseImageProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl HeaderImageSource for GeneratedImageSource {
    fn tier(&self) -> ImageSource {
        ImageSource::Generated
    }

    async fn lookup(&self, course: &Course, _index: u32) -> Result<Option<String>, ComposeError> {
        Ok(Some(self.provider.generated_image(course).await?))
    }
}

/// Tries each source in order; the first image found wins.
#[derive(Clone)]
pub struct HeaderImageResolver {
    sources: Vec<Arc<dyn HeaderImageSource>>,
}

impl HeaderImageResolver {
    /// Cache, then course metadata, then the generated pattern.
    #[must_use]
    pub fn standard(
        cache: Arc<dyn HeaderImageCache>,
        provider: Arc<dyn CourseImageProvider>,
    ) -> Self {
        Self::with_sources(vec![
            Arc::new(CachedImageSource::new(cache)),
            Arc::new(MetadataImageSource::new(Arc::clone(&provider))),
            Arc::new(GeneratedImageSource::new(provider)),
        ])
    }

    #[must_use]
    pub fn with_sources(sources: Vec<Arc<dyn HeaderImageSource>>) -> Self {
        Self { sources }
    }

    /// Resolve the image for `(course, index)`.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError` if a source fails before an image is found.
    pub async fn resolve(
        &self,
        course: &Course,
        index: u32,
    ) -> Result<Option<HeaderImage>, ComposeError> {
        for source in &self.sources {
            if let Some(url) = source.lookup(course, index).await? {
                let tier = source.tier();
                tracing::debug!(course = %course.id, index, ?tier, "resolved header image");
                return Ok(Some(HeaderImage { url, source: tier }));
            }
        }
        Ok(None)
    }
}

const PATTERN_COLORS: [&str; 10] = [
    "#81ecec", "#74b9ff", "#a29bfe", "#dfe6e9", "#00b894", "#0984e3", "#b2bec3", "#fdcb6e",
    "#fd79a8", "#6c5ce7",
];
const PATTERN_WIDTH: u64 = 600;
const PATTERN_HEIGHT: u64 = 200;

/// Deterministic SVG placeholder for a course, as a `data:` URI.
#[must_use]
pub fn generated_pattern(course: CourseId) -> String {
    let seed = course.value();
    // `seed % 10` always indexes within the palette.
    #[allow(clippy::cast_possible_truncation)]
    let color = PATTERN_COLORS[(seed % PATTERN_COLORS.len() as u64) as usize];
    let hash = seed.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);

    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{PATTERN_WIDTH}' height='{PATTERN_HEIGHT}'>\
         <rect width='{PATTERN_WIDTH}' height='{PATTERN_HEIGHT}' fill='{color}'/>"
    );
    for i in 0..8_u32 {
        let h = hash.rotate_left(i * 8);
        let cx = h % PATTERN_WIDTH;
        let cy = (h >> 16) % PATTERN_HEIGHT;
        let r = 10 + (h >> 32) % 50;
        let opacity = 10 + (h >> 48) % 30;
        let _ = write!(
            svg,
            "<circle cx='{cx}' cy='{cy}' r='{r}' fill='#ffffff' fill-opacity='0.{opacity:02}'/>"
        );
    }
    svg.push_str("</svg>");
    format!("data:image/svg+xml;utf8,{}", encode_svg(&svg))
}

fn encode_svg(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len() + svg.len() / 4);
    for ch in svg.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '"' => out.push_str("%22"),
            ' ' => out.push_str("%20"),
            _ => out.push(ch),
        }
    }
    out
}
