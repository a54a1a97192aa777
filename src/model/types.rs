//! Building blocks of a statistical model: variables, terms, family and link

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::errors::ValidationError;
use crate::templates::r_string;

// ═══════════════════════════════════════════════════════════════════════════════
// Variables
// ═══════════════════════════════════════════════════════════════════════════════

/// Role a variable plays in the formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Left-hand side of the formula
    Dependent,
    /// Right-hand side of the formula
    Independent,
}

/// A named column of the data set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    role: Role,
    levels: Option<Vec<String>>,
}

impl Variable {
    pub(crate) fn new(name: impl Into<String>, role: Role, levels: Option<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            role,
            levels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Declared categorical levels, if any
    pub fn levels(&self) -> Option<&[String]> {
        self.levels.as_deref()
    }

    pub fn is_categorical(&self) -> bool {
        self.levels.is_some()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Terms
// ═══════════════════════════════════════════════════════════════════════════════

/// Combined effect of two or more independent variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionTerm {
    variables: Vec<String>,
}

impl InteractionTerm {
    pub(crate) fn new(variables: Vec<String>) -> Self {
        Self { variables }
    }

    /// Constituent variable names in declaration order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Synthetic variable name, e.g. `X1_X_X2` for the `_X_` joiner
    pub fn synthetic_name(&self, joiner: &str) -> String {
        self.variables.join(joiner)
    }
}

/// Group-level intercept, optionally with random slopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomEffect {
    group: String,
    slopes: Vec<String>,
}

impl RandomEffect {
    pub(crate) fn new(group: impl Into<String>, slopes: Vec<String>) -> Self {
        Self {
            group: group.into(),
            slopes,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn slopes(&self) -> &[String] {
        &self.slopes
    }

    /// lme4 term, `(1|group)` or `(1+slope|group)`
    pub fn term(&self, separator: &str) -> String {
        let mut lhs = vec!["1"];
        lhs.extend(self.slopes.iter().map(String::as_str));
        format!("({}|{})", lhs.join(separator), self.group)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Family
// ═══════════════════════════════════════════════════════════════════════════════

/// Distribution assumed for the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Gaussian,
    Binomial,
    Poisson,
    Gamma,
    InverseGaussian,
    QuasiBinomial,
    QuasiPoisson,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Self::Gaussian,
        Self::Binomial,
        Self::Poisson,
        Self::Gamma,
        Self::InverseGaussian,
        Self::QuasiBinomial,
        Self::QuasiPoisson,
    ];

    /// Family function name in R
    pub fn r_name(&self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Binomial => "binomial",
            Self::Poisson => "poisson",
            Self::Gamma => "Gamma",
            Self::InverseGaussian => "inverse.gaussian",
            Self::QuasiBinomial => "quasibinomial",
            Self::QuasiPoisson => "quasipoisson",
        }
    }

    /// Link R uses when none is given
    pub fn canonical_link(&self) -> Link {
        match self {
            Self::Gaussian => Link::Identity,
            Self::Binomial | Self::QuasiBinomial => Link::Logit,
            Self::Poisson | Self::QuasiPoisson => Link::Log,
            Self::Gamma => Link::Inverse,
            Self::InverseGaussian => Link::InverseSquared,
        }
    }

    /// Links the R family function accepts
    pub fn allowed_links(&self) -> &'static [Link] {
        match self {
            Self::Gaussian => &[Link::Identity, Link::Log, Link::Inverse],
            Self::Binomial | Self::QuasiBinomial => &[
                Link::Logit,
                Link::Probit,
                Link::Cauchit,
                Link::Log,
                Link::Cloglog,
            ],
            Self::Poisson | Self::QuasiPoisson => &[Link::Log, Link::Identity, Link::Sqrt],
            Self::Gamma => &[Link::Inverse, Link::Identity, Link::Log],
            Self::InverseGaussian => &[
                Link::InverseSquared,
                Link::Inverse,
                Link::Identity,
                Link::Log,
            ],
        }
    }

    pub fn supports(&self, link: Link) -> bool {
        self.allowed_links().contains(&link)
    }

    /// Quasi-likelihood families are only available to `glm`
    pub fn is_quasi(&self) -> bool {
        matches!(self, Self::QuasiBinomial | Self::QuasiPoisson)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.r_name())
    }
}

impl FromStr for Family {
    type Err = ValidationError;

    /// Accepts R spellings and `GaussianFamily`-style names, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s, "family");
        let family = match key.as_str() {
            "gaussian" | "normal" => Self::Gaussian,
            "binomial" => Self::Binomial,
            "poisson" => Self::Poisson,
            "gamma" => Self::Gamma,
            "inversegaussian" => Self::InverseGaussian,
            "quasibinomial" => Self::QuasiBinomial,
            "quasipoisson" => Self::QuasiPoisson,
            _ => {
                return Err(ValidationError::UnsupportedFamily {
                    name: s.to_string(),
                })
            }
        };
        Ok(family)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Link
// ═══════════════════════════════════════════════════════════════════════════════

/// Function relating the linear predictor to the expected response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    Identity,
    Log,
    Logit,
    Probit,
    Cauchit,
    Cloglog,
    Inverse,
    Sqrt,
    InverseSquared,
}

impl Link {
    pub const ALL: [Link; 9] = [
        Self::Identity,
        Self::Log,
        Self::Logit,
        Self::Probit,
        Self::Cauchit,
        Self::Cloglog,
        Self::Inverse,
        Self::Sqrt,
        Self::InverseSquared,
    ];

    /// Link name as R's `make.link` spells it
    pub fn r_name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Log => "log",
            Self::Logit => "logit",
            Self::Probit => "probit",
            Self::Cauchit => "cauchit",
            Self::Cloglog => "cloglog",
            Self::Inverse => "inverse",
            Self::Sqrt => "sqrt",
            Self::InverseSquared => "1/mu^2",
        }
    }

    /// Quoted R string literal, e.g. `'identity'`
    pub fn r_literal(&self) -> String {
        r_string(self.r_name())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.r_name())
    }
}

impl FromStr for Link {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s, "link");
        let link = match key.as_str() {
            "identity" => Self::Identity,
            "log" => Self::Log,
            "logit" => Self::Logit,
            "probit" => Self::Probit,
            "cauchit" | "cauchy" => Self::Cauchit,
            "cloglog" => Self::Cloglog,
            "inverse" | "reciprocal" => Self::Inverse,
            "sqrt" | "squareroot" => Self::Sqrt,
            "1/mu^2" | "inversesquared" | "inversesquare" => Self::InverseSquared,
            _ => {
                return Err(ValidationError::UnsupportedLink {
                    name: s.to_string(),
                })
            }
        };
        Ok(link)
    }
}

/// Lowercase, drop separators and a trailing `suffix` (`GaussianFamily` -> `gaussian`)
fn normalize(s: &str, suffix: &str) -> String {
    let key: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' ' | '.'))
        .collect::<String>()
        .to_lowercase();
    match key.strip_suffix(suffix) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => key,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Names
// ═══════════════════════════════════════════════════════════════════════════════

const RESERVED_WORDS: &[&str] = &[
    "if",
    "else",
    "repeat",
    "while",
    "function",
    "for",
    "in",
    "next",
    "break",
    "TRUE",
    "FALSE",
    "NULL",
    "Inf",
    "NaN",
    "NA",
    "NA_integer_",
    "NA_real_",
    "NA_character_",
    "NA_complex_",
    "...",
];

/// Whether `name` can appear unquoted in an R formula
pub fn is_syntactic_name(name: &str) -> bool {
    let mut chars = name.chars();
    let valid_start = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };

    valid_start
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        && !RESERVED_WORDS.contains(&name)
}
