//! Checks that turn a description into a statistical model

use std::collections::HashSet;

use crate::config::FormulaConvention;
use crate::description::{ModelDescription, RandomEffectSpec, VariableSpec};
use crate::model::errors::ValidationError;
use crate::model::types::*;
use crate::model::StatisticalModel;

/// Runs every check against one description
pub(crate) struct Validator<'a> {
    description: &'a ModelDescription,
    convention: &'a FormulaConvention,
}

impl<'a> Validator<'a> {
    pub(crate) fn new(
        description: &'a ModelDescription,
        convention: &'a FormulaConvention,
    ) -> Self {
        Self {
            description,
            convention,
        }
    }

    /// Validate the description, failing on the first violated invariant
    pub(crate) fn validate(&self) -> Result<StatisticalModel, ValidationError> {
        // 0. How terms are rendered
        self.convention.validate()?;

        // 1. Variables
        let dependent = self.validate_dependent()?;
        let independents = self.validate_independents(&dependent)?;

        // 2. Terms built from them
        let interactions = self.validate_interactions(&dependent, &independents)?;
        let random_effects = self.validate_random_effects(&dependent, &independents)?;

        // 3. Distribution
        let (family, link) = self.validate_family_link()?;
        if family.is_quasi() && !random_effects.is_empty() {
            return Err(ValidationError::QuasiFamilyWithRandomEffects {
                family: family.r_name().to_string(),
            });
        }

        Ok(StatisticalModel {
            id: self.description.id.clone(),
            dependent,
            independents,
            interactions,
            random_effects,
            family,
            link,
            convention: self.convention.clone(),
        })
    }

    fn validate_dependent(&self) -> Result<Variable, ValidationError> {
        let spec = self
            .description
            .dependent
            .as_ref()
            .ok_or(ValidationError::MissingDependent)?;
        variable_from_spec(spec, Role::Dependent, "dependent")
    }

    fn validate_independents(&self, dependent: &Variable) -> Result<Vec<Variable>, ValidationError> {
        if self.description.independent.is_empty() {
            return Err(ValidationError::NoIndependentVariables);
        }

        let mut seen = HashSet::new();
        seen.insert(dependent.name());

        let mut independents = Vec::with_capacity(self.description.independent.len());
        for spec in &self.description.independent {
            if !seen.insert(spec.name()) {
                return Err(ValidationError::DuplicateVariable {
                    name: spec.name().to_string(),
                });
            }
            independents.push(variable_from_spec(spec, Role::Independent, "independent")?);
        }
        Ok(independents)
    }

    fn validate_interactions(
        &self,
        dependent: &Variable,
        independents: &[Variable],
    ) -> Result<Vec<InteractionTerm>, ValidationError> {
        let declared: HashSet<&str> = independents.iter().map(|v| v.name()).collect();
        let mut combinations: HashSet<Vec<&str>> = HashSet::new();
        let mut synthetic_names: HashSet<String> = HashSet::new();

        let mut interactions = Vec::with_capacity(self.description.interactions.len());
        for term in &self.description.interactions {
            let distinct: HashSet<&String> = term.iter().collect();
            if term.len() < 2 || distinct.len() != term.len() {
                return Err(ValidationError::InteractionTooShort { term: term.clone() });
            }

            if let Some(name) = term.iter().find(|name| !declared.contains(name.as_str())) {
                return Err(ValidationError::UndeclaredInteractionVariable {
                    name: name.clone(),
                    term: term.clone(),
                });
            }

            let interaction = InteractionTerm::new(term.clone());
            let synthetic = interaction.synthetic_name(&self.convention.interaction_joiner);
            if declared.contains(synthetic.as_str()) || synthetic == dependent.name() {
                return Err(ValidationError::TermCollision { name: synthetic });
            }
            // X1:X2 and X2:X1 are the same effect
            let mut key: Vec<&str> = term.iter().map(String::as_str).collect();
            key.sort_unstable();
            if !combinations.insert(key) {
                return Err(ValidationError::DuplicateInteraction { name: synthetic });
            }
            // [a_X_b, c] and [a, b_X_c] render the same name
            if !synthetic_names.insert(synthetic.clone()) {
                return Err(ValidationError::TermCollision { name: synthetic });
            }

            interactions.push(interaction);
        }
        Ok(interactions)
    }

    fn validate_random_effects(
        &self,
        dependent: &Variable,
        independents: &[Variable],
    ) -> Result<Vec<RandomEffect>, ValidationError> {
        let declared: HashSet<&str> = independents.iter().map(|v| v.name()).collect();
        let mut groups = HashSet::new();

        let mut effects = Vec::with_capacity(self.description.random.len());
        for RandomEffectSpec { group, slopes } in &self.description.random {
            if !is_syntactic_name(group) {
                return Err(ValidationError::invalid_name("random", group.clone()));
            }
            if group == dependent.name() {
                return Err(ValidationError::GroupIsDependent {
                    group: group.clone(),
                });
            }
            if !groups.insert(group.as_str()) {
                return Err(ValidationError::DuplicateRandomGroup {
                    group: group.clone(),
                });
            }
            if let Some(name) = slopes.iter().find(|s| !declared.contains(s.as_str())) {
                return Err(ValidationError::UndeclaredSlope {
                    group: group.clone(),
                    name: name.clone(),
                });
            }
            effects.push(RandomEffect::new(group.clone(), slopes.clone()));
        }
        Ok(effects)
    }

    fn validate_family_link(&self) -> Result<(Family, Link), ValidationError> {
        let family: Family = self
            .description
            .family
            .as_deref()
            .ok_or(ValidationError::MissingFamily)?
            .parse()?;

        let link = match self.description.link.as_deref() {
            Some(name) => name.parse()?,
            None => family.canonical_link(),
        };

        if !family.supports(link) {
            return Err(ValidationError::IncompatibleLink {
                family: family.r_name().to_string(),
                link: link.r_name().to_string(),
            });
        }
        Ok((family, link))
    }
}

fn variable_from_spec(
    spec: &VariableSpec,
    role: Role,
    field: &'static str,
) -> Result<Variable, ValidationError> {
    let name = spec.name();
    if !is_syntactic_name(name) {
        return Err(ValidationError::invalid_name(field, name));
    }

    if let Some(levels) = spec.levels() {
        if levels.is_empty() {
            return Err(ValidationError::EmptyLevels {
                variable: name.to_string(),
            });
        }
        let mut seen = HashSet::new();
        for level in levels {
            if !seen.insert(level) {
                return Err(ValidationError::DuplicateLevel {
                    variable: name.to_string(),
                    level: level.clone(),
                });
            }
        }
    }

    Ok(Variable::new(name, role, spec.levels().map(<[String]>::to_vec)))
}
