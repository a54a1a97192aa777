//! Generate R analysis scripts from declarative statistical-model descriptions
//!
//! # Overview
//!
//! A model is described by its dependent variable, independent variables,
//! interaction terms, optional random effects, and a family/link pair. The
//! description is validated into a [`StatisticalModel`], and a
//! [`CodeGenerator`] turns that model into an R script in three sections:
//!
//! ```r
//! options(repos = c(CRAN = 'https://cloud.r-project.org'))
//! if (!requireNamespace('tidyverse', quietly = TRUE)) install.packages('tidyverse')
//! if (!requireNamespace('lme4', quietly = TRUE)) install.packages('lme4', dependencies = TRUE)
//! library(tidyverse)
//! library(lme4)
//!
//! # Replace 'PATH' with the path to your data file before running this script.
//! data <- read.csv('PATH')
//!
//! model <- glm(formula = PINCP ~ AGEP+SCHL, family = gaussian(link = 'identity'), data = data)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use glmscript::{build_model, CodeGenerator};
//!
//! let model = build_model(r#"{
//!     "schema": "1.0",
//!     "dependent": "PINCP",
//!     "independent": ["AGEP", "SCHL"],
//!     "family": "gaussian",
//!     "link": "identity"
//! }"#)?;
//!
//! let generator = CodeGenerator::with_data(&model, "census.csv")?;
//! println!("{}", generator.script()?);
//! let path = generator.write_out_file("scripts")?;
//! ```
//!
//! # Error Handling
//!
//! Invalid models and unsupported data files are rejected with a
//! [`ValidationError`] before any text is generated; missing templates are a
//! [`LookupError`]; everything else (parsing, I/O, the R runtime) is a
//! [`ScriptError`], which also wraps the other two.

pub mod codegen;
pub mod config;
pub mod data;
pub mod description;
pub mod error;
pub mod model;
pub mod runtime;
pub mod templates;

pub use codegen::{CodeGenerator, FittingFunction, GeneratedScript};
pub use config::{FormulaConvention, GeneratorConfig, Settings};
pub use data::DataSource;
pub use description::ModelDescription;
pub use error::ScriptError;
pub use model::{Family, Link, StatisticalModel, ValidationError};
pub use runtime::RRuntime;
pub use templates::{LookupError, TemplateTable};

/// Parse a JSON model description
pub fn parse_description(json: &str) -> Result<ModelDescription, ScriptError> {
    ModelDescription::from_str(json)
}

/// Parse and validate a JSON model description
pub fn build_model(json: &str) -> Result<StatisticalModel, ScriptError> {
    let description = ModelDescription::from_str(json)?;
    Ok(StatisticalModel::new(&description)?)
}

/// Parse, validate, and generate the script for a JSON model description
///
/// The script reads the description's `data` file when one is given.
pub fn generate_script(json: &str) -> Result<String, ScriptError> {
    let description = ModelDescription::from_str(json)?;
    let model = StatisticalModel::new(&description)?;
    let generator = CodeGenerator::try_new(&model, description.data.as_deref())?;
    Ok(generator.script()?)
}

pub mod prelude {
    pub use crate::codegen::{CodeGenerator, GeneratedScript};
    pub use crate::config::{FormulaConvention, GeneratorConfig, Settings};
    pub use crate::data::DataSource;
    pub use crate::description::{ModelDescription, RandomEffectSpec, VariableSpec};
    pub use crate::error::ScriptError;
    pub use crate::model::{
        Family, InteractionTerm, Link, RandomEffect, Role, StatisticalModel, ValidationError,
        Variable,
    };
    pub use crate::templates::{LookupError, TemplateTable};
    pub use crate::{build_model, generate_script, parse_description};
}
