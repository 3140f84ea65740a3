//! Configuration loading for vhdl-style-linter
//!
//! Loads `vhdl-style.toml` or `vhdl-style.json`, found explicitly or by
//! walking up from the linted path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classify::ClassifierOptions;

/// File names searched for, in order, in each directory
pub const CONFIG_FILE_NAMES: [&str; 2] = ["vhdl-style.toml", "vhdl-style.json"];

/// Key of the rule block whose options apply to every rule
pub const GLOBAL_KEY: &str = "global";

/// Options of one rule block, loosely typed until a rule validates them
pub type RuleOptions = BTreeMap<String, Value>;

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    /// `global` plus one block per `<group>_<identifier>`
    #[serde(default)]
    pub rule: BTreeMap<String, RuleOptions>,

    #[serde(default)]
    pub skip_phase: Vec<u8>,

    #[serde(default)]
    pub max_phase: Option<u8>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub classifier: ClassifierOptions,
}

impl Config {
    pub fn global(&self) -> Option<&RuleOptions> {
        self.rule.get(GLOBAL_KEY)
    }

    /// Per-rule blocks, without the global one
    pub fn rule_blocks(&self) -> impl Iterator<Item = (&String, &RuleOptions)> {
        self.rule.iter().filter(|(key, _)| key.as_str() != GLOBAL_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("configuration names unknown rule '{0}'")]
    UnknownRule(String),
    #[error("rule {rule}: invalid value for '{option}': {reason}")]
    InvalidValue {
        rule: String,
        option: String,
        reason: String,
    },
    #[error("failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

impl ConfigurationError {
    pub fn invalid(rule: &str, option: &str, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidValue {
            rule: rule.to_string(),
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}

/// Find a configuration file starting from a path and walking up
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_file() {
        start_path.parent()?
    } else {
        start_path
    };

    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }

        current = current.parent()?;
    }
}

/// Load one configuration file, choosing the format from its extension
pub fn load_config(path: &Path) -> Result<Config, ConfigurationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parse_error = |reason: String| ConfigurationError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Load the explicit file if given, otherwise the nearest discovered one
///
/// No file at all yields the default configuration.
pub fn resolve_config(
    explicit: Option<&Path>,
    start_path: &Path,
) -> Result<(Config, Option<PathBuf>), ConfigurationError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file(start_path),
    };
    match path {
        Some(p) => Ok((load_config(&p)?, Some(p))),
        None => Ok((Config::default(), None)),
    }
}

/// Merge command line arguments with config file settings
/// Command line arguments take precedence
pub fn merge_config(
    mut config: Config,
    cli_max_phase: Option<u8>,
    cli_skip_phase: &[u8],
    cli_exclude: &[String],
) -> Config {
    if cli_max_phase.is_some() {
        config.max_phase = cli_max_phase;
    }
    for phase in cli_skip_phase {
        if !config.skip_phase.contains(phase) {
            config.skip_phase.push(*phase);
        }
    }
    config.exclude.extend(cli_exclude.iter().cloned());

    for default in [".git", ".svn"] {
        if !config.exclude.iter().any(|e| e == default) {
            config.exclude.push(default.to_string());
        }
    }
    config
}

pub fn expect_bool(rule: &str, option: &str, value: &Value) -> Result<bool, ConfigurationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(ConfigurationError::invalid(rule, option, format!("expected a boolean, got {}", other))),
    }
}

pub fn expect_usize(rule: &str, option: &str, value: &Value) -> Result<usize, ConfigurationError> {
    let number = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };
    number
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            ConfigurationError::invalid(rule, option, format!("expected a non-negative integer, got {}", value))
        })
}

pub fn expect_string<'v>(
    rule: &str,
    option: &str,
    value: &'v Value,
) -> Result<&'v str, ConfigurationError> {
    value
        .as_str()
        .ok_or_else(|| ConfigurationError::invalid(rule, option, format!("expected a string, got {}", value)))
}

/// A string that must be one of `allowed`, compared case-insensitively
pub fn expect_choice(
    rule: &str,
    option: &str,
    value: &Value,
    allowed: &[&str],
) -> Result<String, ConfigurationError> {
    let text = expect_string(rule, option, value)?.to_ascii_lowercase();
    if allowed.contains(&text.as_str()) {
        Ok(text)
    } else {
        Err(ConfigurationError::invalid(
            rule,
            option,
            format!("expected one of {}, got '{}'", allowed.join(", "), text),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("vhdl-style.toml");
        fs::write(&config_path, "exclude = [\"sim\"]").unwrap();

        // From the same directory
        assert_eq!(find_config_file(dir.path()), Some(config_path.clone()));

        // From a subdirectory
        let subdir = dir.path().join("rtl");
        fs::create_dir(&subdir).unwrap();
        assert_eq!(find_config_file(&subdir), Some(config_path));
    }

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vhdl-style.toml");

        let content = r#"
skip_phase = [6]
max_phase = 5

[rule.global]
indentSize = 4

[rule.context_ref_002]
number_of_spaces = 2
disable = false

[classifier.generic]
allow_bus = true
"#;
        fs::write(&path, content).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.skip_phase, vec![6]);
        assert_eq!(config.max_phase, Some(5));
        assert_eq!(config.global().unwrap()["indentSize"], json!(4));
        assert_eq!(config.rule["context_ref_002"]["number_of_spaces"], json!(2));
        assert!(config.classifier.generic.allow_bus);
        assert!(config.classifier.generic.allow_mode);
        assert_eq!(config.rule_blocks().count(), 1);
    }

    #[test]
    fn test_load_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vhdl-style.json");
        fs::write(
            &path,
            r#"{"rule": {"architecture_010": {"disable": true}}, "exclude": ["tb"]}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.rule["architecture_010"]["disable"], json!(true));
        assert_eq!(config.exclude, vec!["tb"]);
    }

    #[test]
    fn test_unparsable_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vhdl-style.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigurationError::Parse { .. })));
        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(ConfigurationError::Read { .. })
        ));
    }

    #[test]
    fn test_resolve_config_without_file() {
        let dir = TempDir::new().unwrap();
        let (config, path) = resolve_config(None, dir.path()).unwrap();
        assert_eq!(path, None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_merge_config() {
        let config = Config {
            skip_phase: vec![2],
            exclude: vec!["sim".to_string()],
            ..Default::default()
        };

        let merged = merge_config(config, Some(4), &[2, 6], &["tb".to_string()]);

        assert_eq!(merged.max_phase, Some(4));
        assert_eq!(merged.skip_phase, vec![2, 6]);
        assert!(merged.exclude.contains(&"sim".to_string()));
        assert!(merged.exclude.contains(&"tb".to_string()));
        assert!(merged.exclude.contains(&".git".to_string())); // Default added
    }

    #[test]
    fn test_value_validation() {
        assert_eq!(expect_bool("r", "disable", &json!("TRUE")), Ok(true));
        assert!(expect_bool("r", "disable", &json!(3)).is_err());
        assert_eq!(expect_usize("r", "indentSize", &json!(4)), Ok(4));
        assert!(expect_usize("r", "indentSize", &json!(-1)).is_err());
        assert_eq!(
            expect_choice("r", "style", &json!("No_Blank_Line"), &["require_blank_line", "no_blank_line"]),
            Ok("no_blank_line".to_string())
        );
        assert!(expect_choice("r", "style", &json!("maybe"), &["yes"]).is_err());
    }
}
