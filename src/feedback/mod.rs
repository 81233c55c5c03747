//! Result items returned to Alfred
//!
//! Scripts collect [`ResultItem`]s and flush them as the XML document Alfred
//! parses from the script's stdout.

pub mod xml;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One candidate entry shown by Alfred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Passed back to the workflow when the item is actioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,

    pub title: String,

    pub subtitle: String,

    /// Icon path, optionally prefixed with `fileicon:` or `filetype:`
    pub icon: String,

    #[serde(default = "default_valid")]
    pub valid: bool,

    /// `None` means no autocompletion; `Some("")` autocompletes with no parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,

    /// Host-recognized item type, e.g. `file`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

fn default_valid() -> bool {
    true
}

impl ResultItem {
    /// Create a valid item with only the required fields
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            uid: None,
            arg: None,
            title: title.into(),
            subtitle: subtitle.into(),
            icon: icon.into(),
            valid: true,
            autocomplete: None,
            kind: None,
        }
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Present fields as (name, value) pairs, with `valid` normalized to yes/no
    pub fn fields(&self) -> Vec<(String, String)> {
        let optional = |name: &str, value: &Option<String>| {
            value.as_ref().map(|v| (name.to_string(), v.clone()))
        };

        let mut fields = Vec::with_capacity(8);
        fields.extend(optional("uid", &self.uid));
        fields.extend(optional("arg", &self.arg));
        fields.push(("title".to_string(), self.title.clone()));
        fields.push(("subtitle".to_string(), self.subtitle.clone()));
        fields.push(("icon".to_string(), self.icon.clone()));
        fields.push((
            "valid".to_string(),
            (if self.valid { "yes" } else { "no" }).to_string(),
        ));
        fields.extend(optional("autocomplete", &self.autocomplete));
        fields.extend(optional("type", &self.kind));
        fields
    }
}

/// A result list supplied to `render_xml` instead of the accumulated one
#[derive(Debug, Clone)]
pub enum ResultsOverride {
    /// Items built with [`ResultItem`]
    Items(Vec<ResultItem>),
    /// Free-form items; unknown keys become child elements
    Raw(Vec<Map<String, Value>>),
    /// Legacy format: a JSON array of objects, or an object whose values are objects
    Json(String),
}

impl ResultsOverride {
    /// Flatten into per-item field lists
    pub fn into_fields(self) -> Result<Vec<Vec<(String, String)>>> {
        match self {
            ResultsOverride::Items(items) => Ok(items.iter().map(ResultItem::fields).collect()),
            ResultsOverride::Raw(items) => Ok(items.iter().map(raw_fields).collect()),
            ResultsOverride::Json(text) => {
                let entries = match serde_json::from_str::<Value>(&text)? {
                    Value::Array(entries) => entries,
                    Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
                    other => {
                        return Err(Error::InvalidResults(format!(
                            "expected a list of items, got {}",
                            other
                        )))
                    }
                };

                entries
                    .into_iter()
                    .map(|entry| match entry {
                        Value::Object(map) => Ok(raw_fields(&map)),
                        other => Err(Error::InvalidResults(format!(
                            "expected an item object, got {}",
                            other
                        ))),
                    })
                    .collect()
            }
        }
    }
}

/// Convert a free-form item; nulls count as absent, scalars use their JSON text
fn raw_fields(item: &Map<String, Value>) -> Vec<(String, String)> {
    item.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
