use serde_json::{Map, Value};

use crate::program::first_identifier;
use crate::TargetSet;

/// Candidate keys for a target object's identifier, in priority order.
pub const TARGET_ID_FIELDS: [&str; 3] = ["target", "endpoint", "asset_identifier"];

/// Accepted shapes of a program's `targets` field.
#[derive(Debug)]
enum TargetLayout<'a> {
    /// `{"category": [item, ...], ...}`
    Categorized(&'a Map<String, Value>),
    /// `[item, ...]`
    Flat(&'a [Value]),
    Unrecognized,
}

impl<'a> TargetLayout<'a> {
    fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Object(categories)) => Self::Categorized(categories),
            Some(Value::Array(items)) => Self::Flat(items),
            _ => Self::Unrecognized,
        }
    }

    fn items(&self) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
        match *self {
            Self::Categorized(categories) => Box::new(
                categories
                    .values()
                    .filter_map(Value::as_array)
                    .flat_map(|items| items.iter()),
            ),
            Self::Flat(items) => Box::new(items.iter()),
            Self::Unrecognized => Box::new(std::iter::empty()),
        }
    }
}

/// Accepted shapes of a single target entry.
#[derive(Debug)]
enum TargetItem<'a> {
    Bare(&'a str),
    Object(&'a Map<String, Value>),
    Unrecognized,
}

impl<'a> TargetItem<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(text) => Self::Bare(text),
            Value::Object(object) => Self::Object(object),
            _ => Self::Unrecognized,
        }
    }

    fn identifier(&self) -> Option<String> {
        match self {
            Self::Bare(text) if !text.is_empty() => Some((*text).to_string()),
            Self::Object(object) => first_identifier(object, &TARGET_ID_FIELDS),
            _ => None,
        }
    }
}

/// Flatten a program's raw `targets` field into a set of identifiers.
///
/// Unrecognized shapes are skipped silently.
pub fn extract_targets(targets: Option<&Value>) -> TargetSet {
    TargetLayout::classify(targets)
        .items()
        .filter_map(|item| TargetItem::classify(item).identifier())
        .collect()
}
