use serde_json::{Map, Value};

use crate::extract::extract_targets;
use crate::TargetSet;

/// Candidate keys for a program's name, in priority order.
pub const PROGRAM_NAME_FIELDS: [&str; 3] = ["name", "handle", "program_name"];

/// One bounty program as listed by a platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub name: Option<String>,
    pub url: Option<String>,
    pub targets: TargetSet,
}

impl Program {
    /// Lenient parse of one program object. Never fails: a value that is not an
    /// object, or carries none of the name fields, yields a program without a name.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            name: first_identifier(object, &PROGRAM_NAME_FIELDS),
            url: object
                .get("url")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(ToOwned::to_owned),
            targets: extract_targets(object.get("targets")),
        }
    }

    pub fn named<S: Into<String>>(
        name: impl Into<String>,
        targets: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            url: None,
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Program url, falling back to the platform's home page.
    pub fn url_or_default(&self, platform: &str) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| default_program_url(platform))
    }
}

pub fn default_program_url(platform: &str) -> String {
    format!("https://{platform}.com")
}

/// First non-empty value among `fields`, in order, coerced to a string.
pub fn first_identifier(object: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| object.get(*field).and_then(coerce_identifier))
}

fn coerce_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        // Null, empty strings, false and nested structures are not identifiers.
        _ => None,
    }
}
