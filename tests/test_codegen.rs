//! Integration tests for script generation
//!
//! These tests run the complete pipeline from a JSON description on disk to
//! the generated R text.

mod common;

use std::path::Path;

use common::{extract_data, extract_family, extract_formula, extract_link, fixture, load_model};
use glmscript::prelude::*;
use glmscript::templates::category;
use glmscript::FittingFunction;

const MAIN_EFFECT_FIXTURES: [&str; 2] = ["main_only.json", "main_interaction.json"];

// ═══════════════════════════════════════════════════════════════════════════════
// Construction Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn test_generator_with_data() {
        for name in MAIN_EFFECT_FIXTURES {
            let model = load_model(name);
            let generator = CodeGenerator::with_data(&model, "data.csv").unwrap();

            assert_eq!(generator.data_path(), Some(Path::new("data.csv")));
            assert!(std::ptr::eq(generator.model(), &model));
        }
    }

    #[test]
    fn test_generator_rejects_non_csv() {
        for name in MAIN_EFFECT_FIXTURES {
            let model = load_model(name);
            let err = CodeGenerator::with_data(&model, "data.txt").unwrap_err();

            assert_eq!(err.field(), "data");
            assert!(err.to_string().contains("data.txt"));
        }
    }

    #[test]
    fn test_generator_without_data() {
        let model = load_model("main_only.json");
        let generator = CodeGenerator::new(&model);
        assert_eq!(generator.data_path(), None);
    }

    #[test]
    fn test_description_data_field() {
        let json = r#"{
            "schema": "1.0",
            "dependent": "PINCP",
            "independent": ["AGEP", "SCHL"],
            "family": "gaussian",
            "link": "identity",
            "data": "census.csv"
        }"#;

        let script = generate_script(json).unwrap();
        assert!(script.contains("data <- read.csv('census.csv')"));
        assert!(!script.contains("# Replace"));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Template Table Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod templates {
    use super::*;

    #[test]
    fn test_builtin_categories() {
        let table = TemplateTable::builtin();
        let categories = table.categories();

        assert!(categories.contains(&category::INSTALLS));
        assert!(categories.contains(&category::IMPORTS));
        assert!(table.contains(category::LOADING));
        assert!(table.contains(category::MODELING));
    }

    #[test]
    fn test_unknown_lookups() {
        let table = TemplateTable::builtin();

        assert_eq!(
            table.category("exports").unwrap_err(),
            LookupError::UnknownCategory("exports".to_string())
        );
        assert!(matches!(
            table.fragment(category::INSTALLS, "ggplot2"),
            Err(LookupError::UnknownFragment { .. })
        ));
    }

    #[test]
    fn test_custom_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.json");
        let mut json: serde_json::Value =
            serde_json::from_str(include_str!("../src/templates/strings.json")).unwrap();
        json["imports"][0]["text"] = "suppressPackageStartupMessages(library(tidyverse))".into();
        std::fs::write(&path, json.to_string()).unwrap();

        let table = TemplateTable::from_path(&path).unwrap();
        let model = load_model("main_only.json");
        let preamble = CodeGenerator::new(&model)
            .with_templates(&table)
            .preamble()
            .unwrap();

        assert!(preamble.contains("suppressPackageStartupMessages(library(tidyverse))"));
        assert!(preamble.contains("library(lme4)"));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Preamble Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod preamble {
    use super::*;

    #[test]
    fn test_preamble_packages() {
        for name in MAIN_EFFECT_FIXTURES {
            let model = load_model(name);
            let preamble = CodeGenerator::new(&model).preamble().unwrap();

            assert!(preamble.contains("install.packages('tidyverse')"), "{name}");
            assert!(preamble.contains("install.packages('lme4'"), "{name}");
            assert!(preamble.contains("library(tidyverse)"), "{name}");
            assert!(preamble.contains("library(lme4)"), "{name}");
        }
    }

    #[test]
    fn test_installs_precede_imports() {
        let model = load_model("main_only.json");
        let preamble = CodeGenerator::new(&model).preamble().unwrap();

        let last_install = preamble.rfind("install.packages").unwrap();
        let first_library = preamble.find("library(").unwrap();
        assert!(last_install < first_library);
        assert!(preamble.ends_with("library(lme4)\n\n"));
    }

    #[test]
    fn test_lme4_listed_once_for_mixed_models() {
        let model = load_model("mixed.json");
        let preamble = CodeGenerator::new(&model).preamble().unwrap();
        assert_eq!(preamble.matches("library(lme4)").count(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod loading {
    use super::*;

    #[test]
    fn test_loading_placeholder() {
        for name in MAIN_EFFECT_FIXTURES {
            let model = load_model(name);
            let loading = CodeGenerator::new(&model).loading().unwrap();

            assert!(loading.contains("# Replace 'PATH'"));
            assert!(loading.contains("data <- read.csv('PATH')"));
        }
    }

    #[test]
    fn test_loading_with_data() {
        for name in MAIN_EFFECT_FIXTURES {
            let model = load_model(name);
            let loading = CodeGenerator::with_data(&model, "data.csv")
                .unwrap()
                .loading()
                .unwrap();

            assert!(loading.contains("data <- read.csv('data.csv')"));
            assert!(!loading.contains("PATH"));
        }
    }

    #[test]
    fn test_loading_escapes_path() {
        let model = load_model("main_only.json");
        let loading = CodeGenerator::with_data(&model, "it's here.csv")
            .unwrap()
            .loading()
            .unwrap();
        assert_eq!(loading, "data <- read.csv('it\\'s here.csv')\n\n");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Modeling Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod modeling {
    use super::*;

    #[test]
    fn test_main_effects_only() {
        let model = load_model("main_only.json");
        let modeling = CodeGenerator::new(&model).modeling().unwrap();

        let (dv, ivs) = extract_formula(&modeling);
        assert_eq!(dv, "PINCP");
        assert!(ivs.contains(&"AGEP".to_string()));
        assert!(ivs.contains(&"SCHL".to_string()));
        assert_eq!(ivs.len(), 2);

        assert_eq!(extract_family(&modeling), "gaussian");
        assert_eq!(extract_link(&modeling), "'identity'");
        assert_eq!(extract_data(&modeling), "data");
    }

    #[test]
    fn test_main_and_interaction_effects() {
        let model = load_model("main_interaction.json");
        let modeling = CodeGenerator::new(&model).modeling().unwrap();

        let (dv, ivs) = extract_formula(&modeling);
        assert_eq!(dv, "Y");
        assert_eq!(ivs, vec!["X1", "X2", "X1_X_X2"]);

        assert_eq!(extract_family(&modeling), "gaussian");
        assert_eq!(extract_link(&modeling), "'identity'");
        assert_eq!(extract_data(&modeling), "data");
    }

    #[test]
    fn test_mixed_model_uses_glmer() {
        let model = load_model("mixed.json");
        let generator = CodeGenerator::new(&model);
        let modeling = generator.modeling().unwrap();

        assert_eq!(generator.fitting_function(), FittingFunction::Glmer);
        assert_eq!(
            modeling,
            "model <- glmer(formula = Weight ~ Time+Diet+(1+Time|Pig)+(1|Litter), \
             family = gaussian(link = 'identity'), data = data)\n"
        );
    }

    #[test]
    fn test_canonical_link_when_omitted() {
        let model = StatisticalModel::builder("count")
            .independent("exposure")
            .family("poisson")
            .build()
            .unwrap();
        let modeling = CodeGenerator::new(&model).modeling().unwrap();

        assert_eq!(extract_family(&modeling), "poisson");
        assert_eq!(extract_link(&modeling), "'log'");
    }

    #[test]
    fn test_gamma_family_spelling() {
        let model = StatisticalModel::builder("cost")
            .independent("age")
            .family("gamma")
            .link("log")
            .build()
            .unwrap();
        let modeling = CodeGenerator::new(&model).modeling().unwrap();
        assert_eq!(extract_family(&modeling), "Gamma");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Script & File Output Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod output {
    use super::*;

    #[test]
    fn test_script_section_order() {
        let model = load_model("main_interaction.json");
        let generator = CodeGenerator::new(&model);
        let generated = generator.generate().unwrap();

        assert_eq!(generated.text(), generator.script().unwrap());
        assert_eq!(generated.packages, vec!["tidyverse", "lme4"]);
        assert_eq!(generated.fitting_function, FittingFunction::Glm);

        let script = generated.text();
        let preamble_at = script.find("library(").unwrap();
        let loading_at = script.find("read.csv").unwrap();
        let modeling_at = script.find("glm(").unwrap();
        assert!(preamble_at < loading_at && loading_at < modeling_at);
    }

    #[test]
    fn test_write_out_file() {
        let dir = tempfile::tempdir().unwrap();

        for name in MAIN_EFFECT_FIXTURES {
            let model = load_model(name);
            let generator = CodeGenerator::new(&model);
            let path = generator.write_out_file(dir.path()).unwrap();

            assert_eq!(path, dir.path().join("model.R"));
            let written = std::fs::read_to_string(&path).unwrap();
            assert_eq!(written, generator.script().unwrap());
        }
    }

    #[test]
    fn test_write_out_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not").join("there");

        let model = load_model("main_only.json");
        let err = CodeGenerator::new(&model)
            .write_out_file(&missing)
            .unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
        assert!(!missing.exists());
    }

    #[test]
    fn test_write_out_file_custom_name() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model("mixed.json");
        let config = GeneratorConfig {
            file_name: "pigs.R".to_string(),
            ..Default::default()
        };

        let path = CodeGenerator::new(&model)
            .with_config(config)
            .unwrap()
            .write_out_file(dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "pigs.R");
    }

    #[test]
    fn test_file_name_cannot_leave_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("scripts");
        std::fs::create_dir(&dir).unwrap();

        let model = load_model("main_only.json");
        let config = GeneratorConfig {
            file_name: "../escape.R".to_string(),
            ..Default::default()
        };

        assert!(CodeGenerator::new(&model).with_config(config).is_err());
        assert!(!root.path().join("escape.R").exists());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Settings Tests
// ═══════════════════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn test_settings_file_changes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{
                "formula": { "termSeparator": " + ", "interactionJoiner": "." },
                "generator": { "modelVariable": "fit" }
            }"#,
        )
        .unwrap();

        let settings = Settings::from_path(&path).unwrap();
        let description = ModelDescription::from_path(fixture("main_interaction.json")).unwrap();
        let model = StatisticalModel::with_convention(&description, settings.formula).unwrap();
        let modeling = CodeGenerator::new(&model)
            .with_config(settings.generator)
            .unwrap()
            .modeling()
            .unwrap();

        assert!(modeling.starts_with("fit <- glm(formula = Y ~ X1 + X2 + X1.X2,"));
    }

    #[test]
    fn test_settings_rejects_bad_file_name() {
        let err = Settings::from_str(r#"{ "generator": { "fileName": "model.py" } }"#).unwrap_err();
        assert!(matches!(err, ScriptError::Config(_)));
    }
}
