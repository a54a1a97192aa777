//! String templates
//!
//! The boilerplate every generated script is assembled from, grouped by
//! category (`setup`, `installs`, `imports`, `loading`, `modeling`) and keyed
//! within a category. The built-in table is embedded at compile time and
//! parsed once; alternative tables can be loaded from JSON with the same
//! layout:
//!
//! ```json
//! {
//!     "imports": [
//!         { "key": "tidyverse", "text": "library(tidyverse)" }
//!     ]
//! }
//! ```
//!
//! Fragment texts may contain `{name}` placeholders, filled in by [`render`].

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::error::ScriptError;

/// Categories the code generator reads from
pub mod category {
    pub const SETUP: &str = "setup";
    pub const INSTALLS: &str = "installs";
    pub const IMPORTS: &str = "imports";
    pub const LOADING: &str = "loading";
    pub const MODELING: &str = "modeling";
}

mod embedded {
    pub const STRINGS: &str = include_str!("strings.json");
}

lazy_static! {
    static ref BUILTIN: TemplateTable =
        TemplateTable::from_str(embedded::STRINGS).expect("embedded template table is valid");
}

/// A template category or fragment that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown template category '{0}'")]
    UnknownCategory(String),

    #[error("Template category '{category}' has no fragment '{key}'")]
    UnknownFragment { category: String, key: String },
}

/// One piece of boilerplate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fragment {
    pub key: String,
    pub text: String,
}

/// Read-only table of fragments grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateTable {
    categories: HashMap<String, Vec<Fragment>>,
}

impl TemplateTable {
    /// The table shipped with the crate
    pub fn builtin() -> &'static TemplateTable {
        &BUILTIN
    }

    /// Parse a table from JSON
    pub fn from_str(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a table from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// All fragments of a category, in table order
    pub fn category(&self, name: &str) -> Result<&[Fragment], LookupError> {
        self.categories
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| LookupError::UnknownCategory(name.to_string()))
    }

    /// Text of one fragment
    pub fn fragment(&self, category: &str, key: &str) -> Result<&str, LookupError> {
        self.category(category)?
            .iter()
            .find(|fragment| fragment.key == key)
            .map(|fragment| fragment.text.as_str())
            .ok_or_else(|| LookupError::UnknownFragment {
                category: category.to_string(),
                key: key.to_string(),
            })
    }

    /// Category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }
}

/// Substitute `{name}` placeholders in one pass
///
/// Substituted values are never rescanned, and placeholders without a value
/// are copied through unchanged.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 2]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Single-quoted R string literal
pub fn r_string(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            _ => literal.push(c),
        }
    }
    literal.push('\'');
    literal
}
