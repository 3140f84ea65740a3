use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use vhdl_style_linter::check_source;
use vhdl_style_linter::config::{load_config, merge_config, resolve_config, Config, ConfigurationError};
use vhdl_style_linter::rule_list::RuleList;
use vhdl_style_linter::rules::base::LintRule;

#[test]
fn test_toml_rule_blocks_configure_the_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vhdl-style.toml");
    fs::write(
        &path,
        r#"
max_phase = 5

[rule.global]
indentSize = 4

[rule.process_035]
phase = 2
compact_alignment = true

[rule.context_ref_002]
number_of_spaces = 2
severity = "warning"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.max_phase, Some(5));

    let mut rules = RuleList::new();
    assert!(rules.configure(&config).is_empty());

    let process_035 = rules.get("process_035").unwrap();
    assert_eq!(process_035.base().phase, 2);
    assert_eq!(process_035.base().indent_size, 4);
    assert_eq!(
        rules.get("context_ref_002").map(|r| r.base().severity.to_string()),
        Some("warning".to_string())
    );

    let docs = rules.rule_documentation();
    let position = |id: &str| docs.iter().position(|d| d.id == id).unwrap();
    assert!(position("process_035") < position("architecture_015"));
}

#[test]
fn test_invalid_values_are_reported_and_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vhdl-style.json");
    fs::write(
        &path,
        r#"{
  "rule": {
    "architecture_010": { "case": "camel" },
    "process_022": { "phase": 0 },
    "instantiation_029": { "compact_alignment": "yes" }
  }
}"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let mut rules = RuleList::new();
    let errors = rules.configure(&config);

    assert_eq!(errors.len(), 3);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigurationError::InvalidValue { .. })));
    // Rejected values keep the defaults
    assert_eq!(rules.get("process_022").map(|r| r.base().phase), Some(3));
}

#[test]
fn test_phase_that_never_runs_is_rejected() {
    let mut config = Config::default();
    config.rule.insert(
        "context_ref_002".to_string(),
        [("phase".to_string(), json!(9))].into_iter().collect(),
    );

    let mut rules = RuleList::new();
    let errors = rules.configure(&config);

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ConfigurationError::InvalidValue { .. }));
    assert_eq!(rules.get("context_ref_002").map(|r| r.base().phase), Some(2));

    let report = check_source("context   c1;\n", &rules, &config).unwrap();
    assert_eq!(report.violations.len(), 1);
}

#[test]
fn test_config_is_discovered_from_a_parent_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("rtl").join("core");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("vhdl-style.toml"), "skip_phase = [6]\n").unwrap();

    let (config, found) = resolve_config(None, &nested).unwrap();
    assert_eq!(found, Some(dir.path().join("vhdl-style.toml")));
    assert_eq!(config.skip_phase, vec![6]);

    let merged = merge_config(config, Some(3), &[6, 2], &["sim".to_string()]);
    assert_eq!(merged.max_phase, Some(3));
    assert_eq!(merged.skip_phase, vec![6, 2]);
    assert!(merged.exclude.contains(&"sim".to_string()));
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = resolve_config(Some(&missing), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Read { .. }));
}

#[test]
fn test_classifier_policy_from_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vhdl-style.toml");
    fs::write(&path, "[classifier.port]\nallow_bus = false\n").unwrap();

    let config = load_config(&path).unwrap();
    assert!(!config.classifier.port.allow_bus);
    assert!(config.classifier.port.allow_mode);
    assert!(config.classifier.generic.allow_default);
}
