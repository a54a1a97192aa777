//! Generator settings
//!
//! Everything that shapes the generated text but is not part of the model
//! itself lives here: the characters used to assemble formulas, the names
//! bound in the script and the packages the preamble installs. All fields
//! have defaults, so a settings file only needs to name what it overrides:
//!
//! ```json
//! {
//!     "formula": { "interactionJoiner": "." },
//!     "generator": { "fileName": "analysis.R", "dataVariable": "df" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ScriptError;
use crate::model::{is_syntactic_name, ValidationError};

/// Characters used to join formula terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FormulaConvention {
    /// Placed between right-hand-side terms
    pub term_separator: String,
    /// Placed between the constituents of an interaction's synthetic name
    pub interaction_joiner: String,
}

impl Default for FormulaConvention {
    fn default() -> Self {
        Self {
            term_separator: "+".to_string(),
            interaction_joiner: "_X_".to_string(),
        }
    }
}

impl FormulaConvention {
    /// Reject separators and joiners that would change the meaning of the
    /// formula
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.term_separator.trim() != "+" {
            return Err(ValidationError::InvalidTermSeparator {
                separator: self.term_separator.clone(),
            });
        }
        // The joiner ends up inside an identifier
        if !is_syntactic_name(&format!("a{}b", self.interaction_joiner)) {
            return Err(ValidationError::InvalidInteractionJoiner {
                joiner: self.interaction_joiner.clone(),
            });
        }
        Ok(())
    }
}

/// Names and packages used by the code generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Variable the data frame is bound to
    pub data_variable: String,
    /// Variable the fitted model is bound to
    pub model_variable: String,
    /// Stand-in for a data path that was not provided
    pub placeholder: String,
    /// Name of the script written by `write_out_file`
    pub file_name: String,
    /// Packages every script installs and loads
    pub base_packages: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            data_variable: "data".to_string(),
            model_variable: "model".to_string(),
            placeholder: "PATH".to_string(),
            file_name: "model.R".to_string(),
            base_packages: vec!["tidyverse".to_string(), "lme4".to_string()],
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (field, name) in [
            ("dataVariable", &self.data_variable),
            ("modelVariable", &self.model_variable),
        ] {
            if !is_syntactic_name(name) {
                return Err(ScriptError::Config(format!(
                    "{} '{}' is not a syntactic R name",
                    field, name
                )));
            }
        }

        if self.placeholder.trim().is_empty() {
            return Err(ScriptError::Config("placeholder must not be empty".into()));
        }

        let file_name = Path::new(&self.file_name);
        let is_plain_name = file_name.file_name().is_some_and(|n| n == file_name.as_os_str());
        if !is_plain_name || !file_name.extension().is_some_and(|ext| ext == "R") {
            return Err(ScriptError::Config(format!(
                "file name '{}' must be a plain file name ending in .R",
                self.file_name
            )));
        }

        Ok(())
    }
}

/// Settings file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub formula: FormulaConvention,
    pub generator: GeneratorConfig,
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_str(json: &str) -> Result<Self, ScriptError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        self.formula.validate()?;
        self.generator.validate()
    }
}
