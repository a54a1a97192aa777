//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use glmscript::{ModelDescription, StatisticalModel};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_model(name: &str) -> StatisticalModel {
    let description = ModelDescription::from_path(fixture(name)).expect("fixture should parse");
    StatisticalModel::new(&description).expect("fixture should validate")
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).expect("start marker") + start.len();
    let to = text[from..].find(end).expect("end marker") + from;
    &text[from..to]
}

/// `(dependent, rhs terms)` of the formula in a model-fitting call
pub fn extract_formula(modeling: &str) -> (String, Vec<String>) {
    let formula = between(modeling, "formula = ", ", family = ");
    let (lhs, rhs) = formula.split_once('~').expect("formula has a tilde");
    let terms = rhs.split('+').map(|t| t.trim().to_string()).collect();
    (lhs.trim().to_string(), terms)
}

pub fn extract_family(modeling: &str) -> String {
    between(modeling, "family = ", "(link").to_string()
}

pub fn extract_link(modeling: &str) -> String {
    between(modeling, "(link = ", ")").to_string()
}

pub fn extract_data(modeling: &str) -> String {
    let from = modeling.rfind("data = ").expect("data argument") + "data = ".len();
    modeling[from..].trim_end().trim_end_matches(')').to_string()
}
