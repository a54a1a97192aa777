use crate::config::FormulaConvention;
use crate::description::{ModelDescription, RandomEffectSpec, VariableSpec};
use crate::model::{StatisticalModel, ValidationError};

/// Assembles a [`ModelDescription`] in code and validates it on `build`
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    description: ModelDescription,
    convention: FormulaConvention,
}

impl ModelBuilder {
    pub fn new(dependent: impl Into<String>) -> Self {
        Self {
            description: ModelDescription {
                dependent: Some(VariableSpec::Name(dependent.into())),
                ..Default::default()
            },
            convention: FormulaConvention::default(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.description.id = Some(id.into());
        self
    }

    pub fn independent(mut self, name: impl Into<String>) -> Self {
        self.description
            .independent
            .push(VariableSpec::Name(name.into()));
        self
    }

    pub fn categorical<I, S>(mut self, name: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description.independent.push(VariableSpec::Detailed {
            name: name.into(),
            levels: Some(levels.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn interaction<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description
            .interactions
            .push(variables.into_iter().map(Into::into).collect());
        self
    }

    pub fn random<I, S>(mut self, group: impl Into<String>, slopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description.random.push(RandomEffectSpec {
            group: group.into(),
            slopes: slopes.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.description.family = Some(family.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.description.link = Some(link.into());
        self
    }

    pub fn convention(mut self, convention: FormulaConvention) -> Self {
        self.convention = convention;
        self
    }

    /// The description built so far, without validating it
    pub fn into_description(self) -> ModelDescription {
        self.description
    }

    pub fn build(self) -> Result<StatisticalModel, ValidationError> {
        StatisticalModel::with_convention(&self.description, self.convention)
    }
}
