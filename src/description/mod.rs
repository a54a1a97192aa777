//! Structured model descriptions
//!
//! A [`ModelDescription`] is the serde image of the JSON document an upstream
//! modelling tool emits. It only checks shape (field names, JSON types and the
//! schema version); the statistical invariants are enforced when the
//! description is turned into a [`StatisticalModel`](crate::model::StatisticalModel).
//!
//! ```json
//! {
//!     "schema": "1.0",
//!     "id": "income",
//!     "dependent": "PINCP",
//!     "independent": ["AGEP", { "name": "SCHL", "levels": ["hs", "ba"] }],
//!     "interactions": [["AGEP", "SCHL"]],
//!     "family": "gaussian",
//!     "link": "identity",
//!     "data": "data.csv"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ScriptError;

/// Supported schema versions
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["1.0"];

/// A statistical model as described by an external document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescription {
    /// Schema version (e.g., "1.0")
    pub schema: String,

    /// Optional model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Response variable
    #[serde(default, alias = "dv", skip_serializing_if = "Option::is_none")]
    pub dependent: Option<VariableSpec>,

    /// Predictors in formula order
    #[serde(default, alias = "ivs")]
    pub independent: Vec<VariableSpec>,

    /// Interaction terms, each a list of independent-variable names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<Vec<String>>,

    /// Random intercepts and slopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub random: Vec<RandomEffectSpec>,

    /// Distribution family (e.g., "gaussian")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Link function; the family's canonical link when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Data file the script should read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

/// A variable given either as a bare name or with categorical levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableSpec {
    /// Just the column name
    Name(String),
    /// Column name plus declared levels
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        levels: Option<Vec<String>>,
    },
}

impl VariableSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed { name, .. } => name,
        }
    }

    pub fn levels(&self) -> Option<&[String]> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { levels, .. } => levels.as_deref(),
        }
    }
}

impl From<&str> for VariableSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for VariableSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Random effect grouped by one variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomEffectSpec {
    /// Grouping variable
    pub group: String,
    /// Independent variables whose slopes vary by group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slopes: Vec<String>,
}

impl Default for ModelDescription {
    fn default() -> Self {
        Self {
            schema: SUPPORTED_SCHEMA_VERSIONS[0].to_string(),
            id: None,
            dependent: None,
            independent: Vec::new(),
            interactions: Vec::new(),
            random: Vec::new(),
            family: None,
            link: None,
            data: None,
        }
    }
}

impl ModelDescription {
    /// Parse a JSON string into a ModelDescription
    pub fn from_str(json: &str) -> Result<Self, ScriptError> {
        let description: Self = serde_json::from_str(json)?;
        description.check_schema_version()?;
        Ok(description)
    }

    /// Parse from a JSON Value
    pub fn from_value(value: serde_json::Value) -> Result<Self, ScriptError> {
        let description: Self = serde_json::from_value(value)?;
        description.check_schema_version()?;
        Ok(description)
    }

    /// Read a description from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, ScriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_schema_version(&self) -> Result<(), ScriptError> {
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&self.schema.as_str()) {
            return Err(ScriptError::UnsupportedSchema {
                version: self.schema.clone(),
                supported: SUPPORTED_SCHEMA_VERSIONS.join(", "),
            });
        }
        Ok(())
    }
}
