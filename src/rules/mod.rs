//! VHDL style rules
//!
//! Rule bodies are thin configurations of a handful of shared strategies
//! (spacing, blank lines, end keywords, case, line splits, alignment). Each
//! production has a module listing its rules.

pub mod base;

// Shared strategies
pub mod alignment;
pub mod blank_line;
pub mod end_keyword;
pub mod spacing;
pub mod split_line;
pub mod token_case;

// Rules per production
pub mod architecture;
pub mod context_ref;
pub mod entity;
pub mod entity_specification;
pub mod instantiation;
pub mod iteration_scheme;
pub mod package;
pub mod process;

use base::LintRule;

/// Get all available rules, in catalog order
pub fn get_all_rules() -> Vec<Box<dyn LintRule>> {
    let mut rules = Vec::new();
    rules.extend(architecture::rules());
    rules.extend(context_ref::rules());
    rules.extend(entity::rules());
    rules.extend(entity_specification::rules());
    rules.extend(instantiation::rules());
    rules.extend(iteration_scheme::rules());
    rules.extend(package::rules());
    rules.extend(process::rules());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_rules_loaded() {
        let rules = get_all_rules();
        let rule_ids: Vec<_> = rules.iter().map(|r| r.rule_id()).collect();

        assert!(rule_ids.contains(&"architecture_010"));
        assert!(rule_ids.contains(&"context_ref_002"));
        assert!(rule_ids.contains(&"instantiation_029"));
        assert!(rule_ids.contains(&"iteration_scheme_101"));

        // (name, identifier) is the configuration key and must be unique
        let unique: HashSet<_> = rule_ids.iter().collect();
        assert_eq!(unique.len(), rule_ids.len());
    }

    #[test]
    fn test_rule_metadata() {
        for rule in get_all_rules() {
            let base = rule.base();
            assert_eq!(rule.rule_id(), format!("{}_{}", base.name, base.identifier));
            assert!((1..=7).contains(&base.phase), "{} has phase {}", rule.rule_id(), base.phase);
            assert!(!base.groups.is_empty(), "{} has no group", rule.rule_id());
            assert!(!rule.description().is_empty());
        }
    }

    #[test]
    fn test_case_rules_run_in_phase_six() {
        for rule in get_all_rules() {
            if rule.base().groups.contains(&"case") {
                assert_eq!(rule.base().phase, 6, "{}", rule.rule_id());
            }
        }
    }
}
