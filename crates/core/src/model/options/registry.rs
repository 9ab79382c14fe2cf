//! Declared option keys and validation of submitted values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde_json::Value;

use super::param::ParamType;
use super::{HiddenSections, ImageFormat, SummaryIcon, SUMMARY_ITEM_SLOTS};

/// Where an option is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    Course,
    Section,
}

/// Allowed values of a select element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectSet {
    HiddenSections,
    Icon,
    ImageFormat,
}

impl SelectSet {
    #[must_use]
    pub fn allows(self, value: &str) -> bool {
        match self {
            Self::HiddenSections => HiddenSections::from_stored(value).is_some(),
            Self::Icon => SummaryIcon::from_key(value).is_some(),
            Self::ImageFormat => ImageFormat::from_key(value).is_some(),
        }
    }
}

/// Form element an option is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Text,
    Checkbox,
    /// Rich text stored as a JSON object with a `text` field.
    Editor,
    Select(SelectSet),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub param: ParamType,
    pub element: Element,
}

impl OptionSpec {
    fn new(name: impl Into<String>, param: ParamType, element: Element) -> Self {
        Self {
            name: name.into(),
            param,
            element,
        }
    }
}

static COURSE_OPTIONS: LazyLock<Vec<OptionSpec>> = LazyLock::new(|| {
    let mut specs = vec![
        OptionSpec::new(
            "hiddensections",
            ParamType::Int,
            Element::Select(SelectSet::HiddenSections),
        ),
        OptionSpec::new("completionstatus", ParamType::Int, Element::Checkbox),
        OptionSpec::new("completiontracking", ParamType::Int, Element::Checkbox),
        OptionSpec::new("detailsheading", ParamType::AlphaNumExt, Element::Text),
        OptionSpec::new("resourcesheading", ParamType::AlphaNumExt, Element::Text),
    ];
    for slot in 1..=SUMMARY_ITEM_SLOTS {
        specs.push(OptionSpec::new(
            format!("sectionheading{slot}"),
            ParamType::AlphaNumExt,
            Element::Text,
        ));
        specs.push(OptionSpec::new(
            format!("sectiontext{slot}"),
            ParamType::Raw,
            Element::Editor,
        ));
        specs.push(OptionSpec::new(
            format!("sectionicon{slot}"),
            ParamType::AlphaExt,
            Element::Select(SelectSet::Icon),
        ));
    }
    specs.extend([
        OptionSpec::new("headerimage", ParamType::Int, Element::Text),
        OptionSpec::new("sectionimage", ParamType::Int, Element::Text),
        OptionSpec::new("headerbackcolor", ParamType::Raw, Element::Text),
        OptionSpec::new(
            "headerimageformat",
            ParamType::Alpha,
            Element::Select(SelectSet::ImageFormat),
        ),
        OptionSpec::new(
            "sectionimageformat",
            ParamType::Alpha,
            Element::Select(SelectSet::ImageFormat),
        ),
        OptionSpec::new("reversedisplay", ParamType::Int, Element::Checkbox),
    ]);
    specs
});

static SECTION_OPTIONS: LazyLock<Vec<OptionSpec>> =
    LazyLock::new(|| vec![OptionSpec::new("sectionimage", ParamType::Int, Element::Text)]);

/// Declared options for a scope, in form order.
#[must_use]
pub fn option_specs(scope: OptionScope) -> &'static [OptionSpec] {
    match scope {
        OptionScope::Course => COURSE_OPTIONS.as_slice(),
        OptionScope::Section => SECTION_OPTIONS.as_slice(),
    }
}

#[must_use]
pub fn find_spec(scope: OptionScope, name: &str) -> Option<&'static OptionSpec> {
    option_specs(scope).iter().find(|spec| spec.name == name)
}

/// Clean submitted values into their stored string form.
///
/// Unknown keys and `null` values are dropped. Objects and arrays (editor
/// fields) are cleaned leaf by leaf and re-encoded as JSON. A select value
/// outside its allowed set is dropped as if it had not been submitted.
#[must_use]
pub fn validate_values(
    scope: OptionScope,
    raw: &BTreeMap<String, Value>,
) -> BTreeMap<String, String> {
    let mut cleaned = BTreeMap::new();
    for (name, value) in raw {
        let Some(spec) = find_spec(scope, name) else {
            continue;
        };
        let stored = match value {
            Value::Null => continue,
            Value::String(s) => spec.param.clean(s),
            Value::Bool(b) => spec.param.clean(if *b { "1" } else { "0" }),
            Value::Number(n) => spec.param.clean(&n.to_string()),
            Value::Array(_) | Value::Object(_) => {
                let leaves = clean_leaves(spec.param, value);
                match serde_json::to_string(&leaves) {
                    Ok(encoded) => encoded,
                    Err(_) => continue,
                }
            }
        };
        if let Element::Select(set) = spec.element {
            if !set.allows(&stored) {
                continue;
            }
        }
        cleaned.insert(name.clone(), stored);
    }
    cleaned
}

fn clean_leaves(param: ParamType, value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(param.clean(s)),
        Value::Array(items) => Value::Array(items.iter().map(|v| clean_leaves(param, v)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), clean_leaves(param, v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
