//! Validation errors raised while building a statistical model or a code generator

use thiserror::Error;

/// Errors that prevent a [`StatisticalModel`](super::StatisticalModel) or a
/// [`CodeGenerator`](crate::codegen::CodeGenerator) from being constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ─────────────────────────────────────────────────────────────────────────
    // Variables
    // ─────────────────────────────────────────────────────────────────────────
    /// No dependent variable was declared
    #[error("Model must declare a dependent variable")]
    MissingDependent,

    /// The independent-variable set is empty
    #[error("Model must declare at least one independent variable")]
    NoIndependentVariables,

    /// Name is not a syntactic R identifier
    #[error("Invalid variable name '{name}' in {field}: names must be syntactic R identifiers")]
    InvalidName { field: &'static str, name: String },

    /// Name declared more than once across dependent and independent sets
    #[error("Duplicate variable name: '{name}'")]
    DuplicateVariable { name: String },

    /// Categorical variable declared with an empty level list
    #[error("Categorical variable '{variable}' declares no levels")]
    EmptyLevels { variable: String },

    /// Categorical level repeated
    #[error("Categorical variable '{variable}' repeats level '{level}'")]
    DuplicateLevel { variable: String, level: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Interaction terms
    // ─────────────────────────────────────────────────────────────────────────
    /// Interaction term with fewer than two distinct variables
    #[error("Interaction term {term:?} must combine at least two distinct variables")]
    InteractionTooShort { term: Vec<String> },

    /// Interaction references a variable that is not an independent variable
    #[error("Interaction term {term:?} references undeclared independent variable '{name}'")]
    UndeclaredInteractionVariable { name: String, term: Vec<String> },

    /// The same interaction term is declared twice
    #[error("Duplicate interaction term: '{name}'")]
    DuplicateInteraction { name: String },

    /// Synthetic interaction name clashes with a declared variable or with
    /// the name of another interaction term
    #[error("Interaction term name '{name}' collides with a declared variable or another interaction term")]
    TermCollision { name: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Random effects
    // ─────────────────────────────────────────────────────────────────────────
    /// The dependent variable cannot be a grouping variable
    #[error("Dependent variable '{group}' cannot group a random effect")]
    GroupIsDependent { group: String },

    /// Two random effects share the same grouping variable
    #[error("Duplicate random effect for group '{group}'")]
    DuplicateRandomGroup { group: String },

    /// Random slope on a variable that is not an independent variable
    #[error("Random slope '{name}' for group '{group}' is not a declared independent variable")]
    UndeclaredSlope { group: String, name: String },

    /// glmer has no quasi-likelihood families
    #[error("Family '{family}' cannot be used with random effects")]
    QuasiFamilyWithRandomEffects { family: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Family and link
    // ─────────────────────────────────────────────────────────────────────────
    /// No family was given
    #[error("Model must declare a family")]
    MissingFamily,

    /// Family outside the supported set
    #[error("Unsupported family '{name}'")]
    UnsupportedFamily { name: String },

    /// Link outside the supported set
    #[error("Unsupported link function '{name}'")]
    UnsupportedLink { name: String },

    /// Link that R does not accept for the family
    #[error("Link '{link}' is not available for family '{family}'")]
    IncompatibleLink { family: String, link: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Formula convention
    // ─────────────────────────────────────────────────────────────────────────
    /// Separator other than `+`, which would change the fitted model
    #[error("Term separator must be '+' (optionally padded with spaces), got '{separator}'")]
    InvalidTermSeparator { separator: String },

    /// Joiner that does not keep synthetic interaction names syntactic
    #[error("Interaction joiner '{joiner}' does not produce syntactic R names")]
    InvalidInteractionJoiner { joiner: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Data source
    // ─────────────────────────────────────────────────────────────────────────
    /// Data file does not use the accepted tabular format
    #[error(
        "Unsupported data file '{path}': expected a .{expected} file, got {}",
        .extension.as_deref().map(|e| format!("'.{}'", e)).unwrap_or_else(|| "no extension".to_string())
    )]
    UnsupportedDataExtension {
        path: String,
        extension: Option<String>,
        expected: &'static str,
    },

    /// Data path that cannot be written into the script unchanged
    #[error("Data file path {path} is not valid UTF-8")]
    NonUtf8DataPath { path: String },
}

impl ValidationError {
    /// Name of the description field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingDependent => "dependent",
            Self::NoIndependentVariables => "independent",
            Self::InvalidName { field, .. } => *field,
            Self::DuplicateVariable { .. } => "independent",
            Self::EmptyLevels { .. } | Self::DuplicateLevel { .. } => "levels",
            Self::InteractionTooShort { .. }
            | Self::UndeclaredInteractionVariable { .. }
            | Self::DuplicateInteraction { .. }
            | Self::TermCollision { .. } => "interactions",
            Self::GroupIsDependent { .. }
            | Self::DuplicateRandomGroup { .. }
            | Self::UndeclaredSlope { .. } => "random",
            Self::MissingFamily
            | Self::UnsupportedFamily { .. }
            | Self::QuasiFamilyWithRandomEffects { .. } => "family",
            Self::UnsupportedLink { .. } | Self::IncompatibleLink { .. } => "link",
            Self::InvalidTermSeparator { .. } | Self::InvalidInteractionJoiner { .. } => "formula",
            Self::UnsupportedDataExtension { .. } | Self::NonUtf8DataPath { .. } => "data",
        }
    }

    pub(crate) fn invalid_name(field: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidName {
            field,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(ValidationError::MissingDependent.field(), "dependent");
        assert_eq!(ValidationError::NoIndependentVariables.field(), "independent");
        assert_eq!(
            ValidationError::UnsupportedLink {
                name: "foo".to_string()
            }
            .field(),
            "link"
        );
        assert_eq!(
            ValidationError::invalid_name("interactions", "1x").field(),
            "interactions"
        );
        assert_eq!(
            ValidationError::InvalidTermSeparator {
                separator: "*".to_string()
            }
            .field(),
            "formula"
        );
    }

    #[test]
    fn test_extension_message() {
        let err = ValidationError::UnsupportedDataExtension {
            path: "data.txt".to_string(),
            extension: Some("txt".to_string()),
            expected: "csv",
        };
        assert!(err.to_string().contains("'.txt'"));

        let err = ValidationError::UnsupportedDataExtension {
            path: "data".to_string(),
            extension: None,
            expected: "csv",
        };
        assert!(err.to_string().contains("no extension"));
    }
}
