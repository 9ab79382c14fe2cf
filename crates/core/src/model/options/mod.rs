//! Typed display options for the two-column format.
//!
//! Options are persisted as name/value strings. Loading goes through
//! [`CourseOptions::from_stored`], which cleans every value to its declared
//! type and falls back to the declared default, so nothing downstream ever
//! sees an unknown key or an unsanitized value.

mod icon;
pub mod param;
pub mod registry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::SectionId;
use param::{ParamType, clean_int};

pub use icon::SummaryIcon;
pub use registry::{OptionScope, OptionSpec, option_specs, validate_values};

/// Number of configurable summary items in the right-hand column.
pub const SUMMARY_ITEM_SLOTS: usize = 5;

pub const DEFAULT_HEADER_BACK_COLOR: &str = "#FFFFFF";

/// How hidden sections are presented to users who cannot see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenSections {
    /// Shown as collapsed "not available" placeholders.
    #[default]
    Collapsed,
    /// Not shown at all.
    Invisible,
}

impl HiddenSections {
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match clean_int(value) {
            0 if !value.trim().is_empty() => Some(Self::Collapsed),
            1 => Some(Self::Invisible),
            _ => None,
        }
    }

    #[must_use]
    pub fn stored(self) -> &'static str {
        match self {
            Self::Collapsed => "0",
            Self::Invisible => "1",
        }
    }

    #[must_use]
    pub fn shows_placeholders(self) -> bool {
        matches!(self, Self::Collapsed)
    }
}

/// CSS fit of a header or section image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Auto,
    Contain,
    ContainLeft,
    Cover,
}

impl ImageFormat {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "auto" => Some(Self::Auto),
            "contain" => Some(Self::Contain),
            "containleft" => Some(Self::ContainLeft),
            "cover" => Some(Self::Cover),
            _ => None,
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Contain => "contain",
            Self::ContainLeft => "containleft",
            Self::Cover => "cover",
        }
    }
}

/// Rich text as stored by an editor element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub text: String,
    #[serde(default = "RichText::html_format")]
    pub format: u8,
}

impl Default for RichText {
    fn default() -> Self {
        Self {
            text: String::new(),
            format: Self::html_format(),
        }
    }
}

impl RichText {
    const HTML: u8 = 1;

    fn html_format() -> u8 {
        Self::HTML
    }

    #[must_use]
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: Self::HTML,
        }
    }

    /// Decode a stored editor value.
    ///
    /// Returns `None` (and logs) when the value is not a JSON object with a
    /// `text` field.
    #[must_use]
    pub fn decode(stored: &str) -> Option<Self> {
        if stored.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Self>(stored) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring undecodable rich text option");
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One configurable `(heading, icon, text)` item of the summary column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryItemOption {
    pub heading: String,
    pub icon: Option<SummaryIcon>,
    pub text: Option<RichText>,
}

/// Course-level display options with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CourseOptions {
    pub hidden_sections: HiddenSections,
    pub completion_status: bool,
    pub completion_tracking: bool,
    pub details_heading: String,
    pub resources_heading: String,
    pub summary_items: [SummaryItemOption; SUMMARY_ITEM_SLOTS],
    /// `0` disables the header image; otherwise the cache index plus one.
    pub header_image: u32,
    pub section_image: u32,
    pub header_back_color: String,
    pub header_image_format: ImageFormat,
    pub section_image_format: ImageFormat,
    pub reverse_display: bool,
}

impl CourseOptions {
    /// Declared defaults; `hidden_sections` comes from the site configuration.
    #[must_use]
    pub fn defaults(hidden_sections: HiddenSections) -> Self {
        Self {
            hidden_sections,
            completion_status: true,
            completion_tracking: true,
            details_heading: "Summary".to_owned(),
            resources_heading: "Resources".to_owned(),
            summary_items: Default::default(),
            header_image: 1,
            section_image: 1,
            header_back_color: DEFAULT_HEADER_BACK_COLOR.to_owned(),
            header_image_format: ImageFormat::Auto,
            section_image_format: ImageFormat::Auto,
            reverse_display: false,
        }
    }

    /// Build typed options from stored name/value pairs.
    ///
    /// Unknown names are ignored. Values are cleaned to their declared type;
    /// anything missing or unusable keeps its default.
    #[must_use]
    pub fn from_stored(stored: &BTreeMap<String, String>, site_default: HiddenSections) -> Self {
        let mut options = Self::defaults(site_default);
        let get = |name: &str| stored.get(name).map(String::as_str);

        if let Some(mode) = get("hiddensections").and_then(HiddenSections::from_stored) {
            options.hidden_sections = mode;
        }
        if let Some(v) = get("completionstatus") {
            options.completion_status = clean_int(v) != 0;
        }
        if let Some(v) = get("completiontracking") {
            options.completion_tracking = clean_int(v) != 0;
        }
        if let Some(v) = get("detailsheading") {
            options.details_heading = ParamType::AlphaNumExt.clean(v);
        }
        if let Some(v) = get("resourcesheading") {
            options.resources_heading = ParamType::AlphaNumExt.clean(v);
        }
        for (index, item) in options.summary_items.iter_mut().enumerate() {
            let slot = index + 1;
            if let Some(v) = get(&format!("sectionheading{slot}")) {
                item.heading = ParamType::AlphaNumExt.clean(v);
            }
            item.icon = get(&format!("sectionicon{slot}"))
                .map(|v| ParamType::AlphaExt.clean(v))
                .and_then(|key| SummaryIcon::from_key(&key));
            item.text = get(&format!("sectiontext{slot}")).and_then(RichText::decode);
        }
        if let Some(v) = get("headerimage") {
            options.header_image = image_index(v);
        }
        if let Some(v) = get("sectionimage") {
            options.section_image = image_index(v);
        }
        if let Some(color) = get("headerbackcolor").filter(|c| is_hex_color(c)) {
            options.header_back_color = color.trim().to_owned();
        }
        if let Some(format) = get("headerimageformat")
            .and_then(|v| ImageFormat::from_key(&ParamType::Alpha.clean(v)))
        {
            options.header_image_format = format;
        }
        if let Some(format) = get("sectionimageformat")
            .and_then(|v| ImageFormat::from_key(&ParamType::Alpha.clean(v)))
        {
            options.section_image_format = format;
        }
        if let Some(v) = get("reversedisplay") {
            options.reverse_display = clean_int(v) != 0;
        }
        options
    }

    /// Stored name/value form, the inverse of [`Self::from_stored`].
    #[must_use]
    pub fn to_stored(&self) -> BTreeMap<String, String> {
        let flag = |b: bool| if b { "1" } else { "0" }.to_owned();
        let mut stored = BTreeMap::new();
        stored.insert(
            "hiddensections".to_owned(),
            self.hidden_sections.stored().to_owned(),
        );
        stored.insert("completionstatus".to_owned(), flag(self.completion_status));
        stored.insert(
            "completiontracking".to_owned(),
            flag(self.completion_tracking),
        );
        stored.insert("detailsheading".to_owned(), self.details_heading.clone());
        stored.insert("resourcesheading".to_owned(), self.resources_heading.clone());
        for (index, item) in self.summary_items.iter().enumerate() {
            let slot = index + 1;
            stored.insert(format!("sectionheading{slot}"), item.heading.clone());
            if let Some(icon) = item.icon {
                stored.insert(format!("sectionicon{slot}"), icon.key().to_owned());
            }
            if let Some(text) = &item.text {
                if let Ok(encoded) = serde_json::to_string(text) {
                    stored.insert(format!("sectiontext{slot}"), encoded);
                }
            }
        }
        stored.insert("headerimage".to_owned(), self.header_image.to_string());
        stored.insert("sectionimage".to_owned(), self.section_image.to_string());
        stored.insert("headerbackcolor".to_owned(), self.header_back_color.clone());
        stored.insert(
            "headerimageformat".to_owned(),
            self.header_image_format.key().to_owned(),
        );
        stored.insert(
            "sectionimageformat".to_owned(),
            self.section_image_format.key().to_owned(),
        );
        stored.insert("reversedisplay".to_owned(), flag(self.reverse_display));
        stored
    }

    /// Cache index of the course header image, `None` when disabled.
    #[must_use]
    pub fn header_image_index(&self) -> Option<u32> {
        self.header_image.checked_sub(1)
    }
}

/// Per-section display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionOptions {
    /// Overrides the course `section_image` when set.
    pub section_image: Option<u32>,
}

impl SectionOptions {
    #[must_use]
    pub fn from_stored(stored: &BTreeMap<String, String>) -> Self {
        Self {
            section_image: stored.get("sectionimage").map(|v| image_index(v)),
        }
    }

    #[must_use]
    pub fn to_stored(&self) -> BTreeMap<String, String> {
        self.section_image
            .map(|image| ("sectionimage".to_owned(), image.to_string()))
            .into_iter()
            .collect()
    }
}

/// All display options of one course, loaded once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub course: CourseOptions,
    pub sections: BTreeMap<SectionId, SectionOptions>,
}

impl DisplayOptions {
    #[must_use]
    pub fn new(course: CourseOptions) -> Self {
        Self {
            course,
            sections: BTreeMap::new(),
        }
    }

    /// Cache index of a section's image, `None` when disabled.
    ///
    /// A per-section override wins over the course-wide value.
    #[must_use]
    pub fn section_image_index(&self, section: SectionId) -> Option<u32> {
        self.sections
            .get(&section)
            .and_then(|s| s.section_image)
            .unwrap_or(self.course.section_image)
            .checked_sub(1)
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::new(CourseOptions::defaults(HiddenSections::default()))
    }
}

fn image_index(value: &str) -> u32 {
    u32::try_from(clean_int(value)).unwrap_or(0)
}

fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.trim().strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
