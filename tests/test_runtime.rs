//! Checks generated scripts against a real R installation
//!
//! Every test returns early when no `Rscript` executable can be found.

mod common;

use common::load_model;
use glmscript::runtime::{find_rscript, RRuntime};
use glmscript::CodeGenerator;

fn runtime() -> Option<RRuntime> {
    match find_rscript() {
        Some(program) => Some(RRuntime::new(program)),
        None => {
            eprintln!("Rscript not found, skipping");
            None
        }
    }
}

#[test]
fn test_generated_scripts_parse() {
    let Some(runtime) = runtime() else { return };
    let dir = tempfile::tempdir().unwrap();

    for name in ["main_only.json", "main_interaction.json", "mixed.json"] {
        let model = load_model(name);
        let path = CodeGenerator::new(&model).write_out_file(dir.path()).unwrap();

        let outcome = runtime.check_syntax(&path).unwrap();
        assert!(outcome.success(), "{name}: {}", outcome.stderr);
    }
}

#[test]
fn test_syntax_error_is_reported() {
    let Some(runtime) = runtime() else { return };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.R");
    std::fs::write(&path, "model <- glm(formula = y ~ , data = \n").unwrap();

    let outcome = runtime.check_syntax(&path).unwrap();
    assert!(!outcome.success());
}

#[test]
fn test_locate_matches_find() {
    match find_rscript() {
        Some(program) => assert_eq!(RRuntime::locate().unwrap().program(), program),
        None => assert!(matches!(
            RRuntime::locate(),
            Err(glmscript::ScriptError::RuntimeNotFound)
        )),
    }
}
