//! Validated statistical models
//!
//! A [`StatisticalModel`] can only be obtained through validation, so every
//! value of the type satisfies the model invariants: one dependent variable,
//! a non-empty list of uniquely named independent variables, interaction
//! terms and random slopes that only reference declared independent
//! variables, and a family/link pair that R accepts.
//!
//! ```ignore
//! use glmscript::model::StatisticalModel;
//!
//! let model = StatisticalModel::builder("PINCP")
//!     .independent("AGEP")
//!     .independent("SCHL")
//!     .family("gaussian")
//!     .link("identity")
//!     .build()?;
//!
//! assert_eq!(model.formula(), "PINCP ~ AGEP+SCHL");
//! assert_eq!(model.family_literal(), "gaussian");
//! assert_eq!(model.link_literal(), "'identity'");
//! ```

mod builder;
mod errors;
mod types;
mod validation;

pub use builder::ModelBuilder;
pub use errors::ValidationError;
pub use types::*;

use crate::config::FormulaConvention;
use crate::description::ModelDescription;
use validation::Validator;

/// One validated statistical model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticalModel {
    id: Option<String>,
    dependent: Variable,
    independents: Vec<Variable>,
    interactions: Vec<InteractionTerm>,
    random_effects: Vec<RandomEffect>,
    family: Family,
    link: Link,
    convention: FormulaConvention,
}

impl StatisticalModel {
    /// Validate a description using the default formula convention
    pub fn new(description: &ModelDescription) -> Result<Self, ValidationError> {
        Self::with_convention(description, FormulaConvention::default())
    }

    /// Validate a description and `convention`, rendering formulas with it
    pub fn with_convention(
        description: &ModelDescription,
        convention: FormulaConvention,
    ) -> Result<Self, ValidationError> {
        Validator::new(description, &convention).validate()
    }

    /// Start building a model programmatically
    pub fn builder(dependent: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(dependent)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn dependent(&self) -> &Variable {
        &self.dependent
    }

    /// Independent variables in declaration order
    pub fn independents(&self) -> &[Variable] {
        &self.independents
    }

    pub fn interactions(&self) -> &[InteractionTerm] {
        &self.interactions
    }

    pub fn random_effects(&self) -> &[RandomEffect] {
        &self.random_effects
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn link(&self) -> Link {
        self.link
    }

    pub fn convention(&self) -> &FormulaConvention {
        &self.convention
    }

    /// Whether the model needs a mixed-effects fit
    pub fn is_mixed(&self) -> bool {
        !self.random_effects.is_empty()
    }

    /// Look up a declared variable by name
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        std::iter::once(&self.dependent)
            .chain(self.independents.iter())
            .find(|v| v.name() == name)
    }

    /// Synthetic names of the interaction terms, in declaration order
    pub fn interaction_names(&self) -> Vec<String> {
        self.interactions
            .iter()
            .map(|term| term.synthetic_name(&self.convention.interaction_joiner))
            .collect()
    }

    /// Right-hand-side terms: independent variables, then interactions,
    /// then random effects, each group in declaration order
    pub fn rhs_terms(&self) -> Vec<String> {
        let separator = self.convention.term_separator.trim();
        self.independents
            .iter()
            .map(|v| v.name().to_string())
            .chain(self.interaction_names())
            .chain(self.random_effects.iter().map(|r| r.term(separator)))
            .collect()
    }

    /// Right-hand side of the formula, e.g. `AGEP+SCHL`
    pub fn formula_rhs(&self) -> String {
        self.rhs_terms().join(&self.convention.term_separator)
    }

    /// Full formula, e.g. `PINCP ~ AGEP+SCHL`
    pub fn formula(&self) -> String {
        format!("{} ~ {}", self.dependent.name(), self.formula_rhs())
    }

    /// Family as a bare R identifier, e.g. `gaussian`
    pub fn family_literal(&self) -> &'static str {
        self.family.r_name()
    }

    /// Link as a quoted R string literal, e.g. `'identity'`
    pub fn link_literal(&self) -> String {
        self.link.r_literal()
    }
}
