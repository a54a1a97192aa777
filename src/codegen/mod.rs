//! Code generation from statistical models to R scripts
//!
//! A script has three sections, each produced by its own method:
//!
//! 1. [`CodeGenerator::preamble`] installs and loads the required packages,
//! 2. [`CodeGenerator::loading`] reads the data into a data frame,
//! 3. [`CodeGenerator::modeling`] fits the model with `glm` or, when the model
//!    has random effects, `lme4::glmer`.
//!
//! [`CodeGenerator::script`] concatenates the three sections in that order and
//! [`CodeGenerator::write_out_file`] saves the result.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::data::DataSource;
use crate::error::ScriptError;
use crate::model::{StatisticalModel, ValidationError};
use crate::templates::{category, r_string, render, LookupError, TemplateTable};

/// Package providing `glmer`
pub const MIXED_EFFECTS_PACKAGE: &str = "lme4";

/// R function used to fit the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FittingFunction {
    /// `stats::glm`
    Glm,
    /// `lme4::glmer`
    Glmer,
}

impl FittingFunction {
    /// Key of the call skeleton in the `modeling` template category
    pub fn template_key(&self) -> &'static str {
        match self {
            Self::Glm => "glm",
            Self::Glmer => "glmer",
        }
    }
}

/// All sections of one generated script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub preamble: String,
    pub loading: String,
    pub modeling: String,
    /// Packages installed by the preamble, in order
    pub packages: Vec<String>,
    pub fitting_function: FittingFunction,
}

impl GeneratedScript {
    /// The complete script text
    pub fn text(&self) -> String {
        [
            self.preamble.as_str(),
            self.loading.as_str(),
            self.modeling.as_str(),
        ]
        .concat()
    }
}

/// Code generator for one statistical model
///
/// The generator borrows its model and never changes after construction, so
/// every fragment method is a pure function of the model, the optional data
/// path, the template table and the configuration.
#[derive(Debug, Clone)]
pub struct CodeGenerator<'a> {
    model: &'a StatisticalModel,
    data: Option<DataSource>,
    templates: &'a TemplateTable,
    config: GeneratorConfig,
}

impl<'a> CodeGenerator<'a> {
    /// Create a generator whose script reads from a placeholder path
    pub fn new(model: &'a StatisticalModel) -> Self {
        Self {
            model,
            data: None,
            templates: TemplateTable::builtin(),
            config: GeneratorConfig::default(),
        }
    }

    /// Create a generator whose script reads `path`, which must be a CSV file
    pub fn with_data(
        model: &'a StatisticalModel,
        path: impl AsRef<Path>,
    ) -> Result<Self, ValidationError> {
        let data = DataSource::new(path)?;
        Ok(Self {
            data: Some(data),
            ..Self::new(model)
        })
    }

    /// Create a generator with an optional data path
    pub fn try_new(
        model: &'a StatisticalModel,
        path: Option<&Path>,
    ) -> Result<Self, ValidationError> {
        match path {
            Some(path) => Self::with_data(model, path),
            None => Ok(Self::new(model)),
        }
    }

    /// Replace the generator settings, rejecting names that would produce
    /// invalid R or a file outside the target directory
    pub fn with_config(mut self, config: GeneratorConfig) -> Result<Self, ScriptError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_templates(mut self, templates: &'a TemplateTable) -> Self {
        self.templates = templates;
        self
    }

    pub fn model(&self) -> &'a StatisticalModel {
        self.model
    }

    pub fn data(&self) -> Option<&DataSource> {
        self.data.as_ref()
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data.as_ref().map(DataSource::path)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn fitting_function(&self) -> FittingFunction {
        if self.model.is_mixed() {
            FittingFunction::Glmer
        } else {
            FittingFunction::Glm
        }
    }

    /// Packages the script needs: the configured base packages, plus the
    /// mixed-effects package for models with random effects
    pub fn packages(&self) -> Vec<&str> {
        let mixed = self.model.is_mixed().then_some(MIXED_EFFECTS_PACKAGE);
        let mut packages: Vec<&str> = Vec::new();
        for package in self
            .config
            .base_packages
            .iter()
            .map(String::as_str)
            .chain(mixed)
        {
            if !packages.contains(&package) {
                packages.push(package);
            }
        }
        packages
    }

    /// Setup, install and library lines
    pub fn preamble(&self) -> Result<String, LookupError> {
        let packages = self.packages();
        let mut lines: Vec<&str> = self
            .templates
            .category(category::SETUP)?
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect();

        for package in &packages {
            lines.push(self.templates.fragment(category::INSTALLS, package)?);
        }
        for package in &packages {
            lines.push(self.templates.fragment(category::IMPORTS, package)?);
        }

        debug!(?packages, "assembled preamble");
        Ok(section(&lines))
    }

    /// Statement binding the data frame, preceded by a reminder comment when
    /// no data path was given
    pub fn loading(&self) -> Result<String, LookupError> {
        let read = self.templates.fragment(category::LOADING, "read")?;
        let data_variable = self.config.data_variable.as_str();

        let text = match &self.data {
            Some(source) => {
                let path = source.r_literal();
                let statement = render(read, &[("data", data_variable), ("path", path.as_str())]);
                section(&[&statement])
            }
            None => {
                let placeholder = self.config.placeholder.as_str();
                let comment = render(
                    self.templates.fragment(category::LOADING, "replace_path")?,
                    &[("placeholder", placeholder)],
                );
                let path = r_string(placeholder);
                let statement = render(read, &[("data", data_variable), ("path", path.as_str())]);
                section(&[&comment, &statement])
            }
        };

        debug!(data = ?self.data_path(), "assembled loading statement");
        Ok(text)
    }

    /// The model-fitting call
    pub fn modeling(&self) -> Result<String, LookupError> {
        let function = self.fitting_function();
        let call = self
            .templates
            .fragment(category::MODELING, function.template_key())?;

        let formula = self.model.formula();
        let link = self.model.link_literal();
        let statement = render(
            call,
            &[
                ("model", self.config.model_variable.as_str()),
                ("formula", formula.as_str()),
                ("family", self.model.family_literal()),
                ("link", link.as_str()),
                ("data", self.config.data_variable.as_str()),
            ],
        );

        debug!(%formula, ?function, "assembled model call");
        Ok(format!("{}\n", statement))
    }

    /// Every section, generated once
    pub fn generate(&self) -> Result<GeneratedScript, LookupError> {
        Ok(GeneratedScript {
            preamble: self.preamble()?,
            loading: self.loading()?,
            modeling: self.modeling()?,
            packages: self.packages().into_iter().map(str::to_string).collect(),
            fitting_function: self.fitting_function(),
        })
    }

    /// `preamble() + loading() + modeling()`
    pub fn script(&self) -> Result<String, LookupError> {
        Ok(self.generate()?.text())
    }

    /// Write the script into `dir` and return the file's path
    ///
    /// The directory must already exist. An existing file of the same name is
    /// overwritten.
    pub fn write_out_file(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ScriptError> {
        let path = dir.as_ref().join(&self.config.file_name);
        let script = self.script()?;

        fs::write(&path, script).map_err(|source| ScriptError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "wrote R script");
        Ok(path)
    }
}

/// Lines of one script section, followed by a blank line
fn section<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text.push('\n');
    text
}
