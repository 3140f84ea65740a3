//! Phase-ordered execution of the rule catalog
//!
//! The rule list is configured once and then only read, so one instance can
//! be shared by every worker thread. Each run returns its own [`RunReport`].

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::{Config, ConfigurationError};
use crate::models::{ReportedViolation, Severity, Violation};
use crate::noqa::{parse_suppressions, retain_unsuppressed};
use crate::rules::base::{LintRule, RuleError};
use crate::rules::get_all_rules;
use crate::stream::TokenStream;

/// Highest phase of the catalog
pub const MAX_PHASE: u8 = 7;

/// Which phases a run visits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSelection {
    pub max_phase: u8,
    pub skip_phases: Vec<u8>,
}

impl Default for PhaseSelection {
    fn default() -> Self {
        Self {
            max_phase: MAX_PHASE,
            skip_phases: Vec::new(),
        }
    }
}

impl PhaseSelection {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_phase: config.max_phase.unwrap_or(MAX_PHASE),
            skip_phases: config.skip_phase.clone(),
        }
    }

    pub fn includes(&self, phase: u8) -> bool {
        phase <= self.max_phase && !self.skip_phases.contains(&phase)
    }
}

/// Outcome of one analyze or fix run over a stream
#[derive(Debug, Default)]
pub struct RunReport {
    /// Violations left in the stream, ordered by line then rule
    pub violations: Vec<Violation>,
    /// Rules that failed; the run continued without them
    pub failures: Vec<RuleError>,
    /// Number of edits applied
    pub fixed: usize,
}

impl RunReport {
    /// Violations active at a line, for an external reporter
    pub fn violations_at_line(&self, line: usize) -> Vec<ReportedViolation> {
        self.violations
            .iter()
            .filter(|v| v.line == line)
            .map(ReportedViolation::from)
            .collect()
    }

    pub fn reported(&self) -> Vec<ReportedViolation> {
        self.violations.iter().map(ReportedViolation::from).collect()
    }

    fn record_failure(&mut self, failure: RuleError) {
        if !self.failures.contains(&failure) {
            self.failures.push(failure);
        }
    }
}

/// One line of `--list-rules` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDocumentation {
    pub id: String,
    pub phase: u8,
    pub subphase: u8,
    pub disabled: bool,
    pub fixable: bool,
    pub severity: Severity,
    pub groups: Vec<String>,
    pub solution: String,
}

pub struct RuleList {
    rules: Vec<Box<dyn LintRule>>,
}

impl Default for RuleList {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleList {
    /// The full catalog with default options
    pub fn new() -> Self {
        Self::from_rules(get_all_rules())
    }

    pub fn from_rules(rules: Vec<Box<dyn LintRule>>) -> Self {
        let mut list = Self { rules };
        list.sort();
        list
    }

    fn sort(&mut self) {
        // Stable, so equal (phase, subphase) keep catalog order
        self.rules
            .sort_by_key(|rule| (rule.base().phase, rule.base().subphase));
    }

    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    pub fn get(&self, rule_id: &str) -> Option<&dyn LintRule> {
        self.rules
            .iter()
            .find(|rule| rule.rule_id() == rule_id)
            .map(|rule| rule.as_ref())
    }

    /// Apply the `global` block to every rule, then each rule's own block
    ///
    /// Rejected options are returned and otherwise ignored; the rule keeps
    /// its previous value for them.
    pub fn configure(&mut self, config: &Config) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();

        for (rule_id, _) in config.rule_blocks() {
            if self.get(rule_id).is_none() {
                warn!("configuration names unknown rule '{}'", rule_id);
                errors.push(ConfigurationError::UnknownRule(rule_id.clone()));
            }
        }

        for rule in &mut self.rules {
            if let Some(global) = config.global() {
                errors.extend(rule.configure(global));
            }
            let id = rule.rule_id().to_string();
            if let Some(options) = config.rule.get(&id) {
                errors.extend(rule.configure(options));
            }
        }

        self.sort();
        errors
    }

    /// Active rules of one phase, in subphase order
    fn phase_rules(&self, phase: u8) -> impl Iterator<Item = &dyn LintRule> {
        self.rules
            .iter()
            .map(|rule| rule.as_ref())
            .filter(move |rule| rule.base().phase == phase && rule.is_enabled())
    }

    fn phases(&self, selection: &PhaseSelection) -> Vec<u8> {
        let mut phases: Vec<u8> = self
            .rules
            .iter()
            .map(|rule| rule.base().phase)
            .filter(|&phase| selection.includes(phase))
            .collect();
        phases.dedup();
        phases
    }

    /// Violations of one rule that are not suppressed by directives
    fn detect(rule: &dyn LintRule, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let mut violations = rule.analyze(stream)?;
        retain_unsuppressed(&mut violations, &parse_suppressions(stream));
        Ok(violations)
    }

    /// Run every selected rule's detection step without changing the stream
    pub fn analyze(&self, stream: &TokenStream, selection: &PhaseSelection) -> RunReport {
        let mut report = RunReport::default();
        for phase in self.phases(selection) {
            for rule in self.phase_rules(phase) {
                match Self::detect(rule, stream) {
                    Ok(violations) => {
                        debug!(rule = rule.rule_id(), count = violations.len(), "analyzed");
                        report.violations.extend(violations);
                    }
                    Err(e) => {
                        warn!("{}", e);
                        report.record_failure(e);
                    }
                }
            }
        }
        report
            .violations
            .sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.rule_id.cmp(&b.rule_id)));
        report
    }

    /// Analyze and fix rule by rule in phase order, then analyze once more
    ///
    /// A rule that still reports violations right after its own fix is
    /// recorded as [`RuleError::NotIdempotent`]. The report's violations are
    /// those of the final pass.
    pub fn fix(&self, stream: &mut TokenStream, selection: &PhaseSelection) -> RunReport {
        let mut report = RunReport::default();
        for phase in self.phases(selection) {
            for rule in self.phase_rules(phase) {
                if !rule.base().fixable {
                    continue;
                }
                match Self::fix_rule(rule, stream) {
                    Ok(applied) => report.fixed += applied,
                    Err(e) => {
                        match e {
                            RuleError::NotIdempotent { .. } => error!("{}", e),
                            _ => warn!("{}", e),
                        }
                        report.record_failure(e);
                    }
                }
            }
        }

        let residual = self.analyze(stream, selection);
        for failure in residual.failures {
            report.record_failure(failure);
        }
        report.violations = residual.violations;
        report
    }

    fn fix_rule(rule: &dyn LintRule, stream: &mut TokenStream) -> Result<usize, RuleError> {
        let violations = Self::detect(rule, stream)?;
        if violations.is_empty() {
            return Ok(0);
        }
        let applied = rule.fix(stream, &violations)?;
        debug!(rule = rule.rule_id(), applied, "fixed");

        let remaining = Self::detect(rule, stream)?;
        if remaining.is_empty() {
            Ok(applied)
        } else {
            Err(RuleError::NotIdempotent {
                rule: rule.rule_id().to_string(),
                remaining: remaining.len(),
            })
        }
    }

    /// Identity and settings of every rule, in execution order
    pub fn rule_documentation(&self) -> Vec<RuleDocumentation> {
        self.rules
            .iter()
            .map(|rule| {
                let base = rule.base();
                RuleDocumentation {
                    id: base.id.clone(),
                    phase: base.phase,
                    subphase: base.subphase,
                    disabled: base.disable,
                    fixable: base.fixable,
                    severity: base.severity,
                    groups: base.groups.iter().map(|g| g.to_string()).collect(),
                    solution: base.solution.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_source, ClassifierOptions};
    use crate::models::Action;
    use crate::rules::base::RuleBase;
    use crate::rules::context_ref;
    use serde_json::json;

    fn stream(source: &str) -> TokenStream {
        classify_source(source, &ClassifierOptions::default()).unwrap()
    }

    /// Reports one violation at line 1 forever and fixes nothing
    struct Stubborn {
        base: RuleBase,
    }

    impl LintRule for Stubborn {
        fn base(&self) -> &RuleBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut RuleBase {
            &mut self.base
        }

        fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
            Ok(vec![self.base.violation(1, stream.toi(0..1), Action::Rewrite {
                text: stream.tokens()[0].text.clone(),
            })])
        }
    }

    #[test]
    fn test_rules_sorted_by_phase() {
        let list = RuleList::new();
        let keys: Vec<_> = list
            .rules()
            .iter()
            .map(|r| (r.base().phase, r.base().subphase))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_phase_override_reorders() {
        let mut list = RuleList::new();
        let mut config = Config::default();
        config
            .rule
            .insert("context_ref_002".to_string(), [("phase".to_string(), json!(7))].into_iter().collect());

        assert!(list.configure(&config).is_empty());
        assert_eq!(list.rules().last().map(|r| r.rule_id()), Some("context_ref_002"));
    }

    #[test]
    fn test_unknown_rule_is_reported() {
        let mut list = RuleList::new();
        let mut config = Config::default();
        config.rule.insert("nonexistent_999".to_string(), Default::default());

        let errors = list.configure(&config);
        assert_eq!(errors, vec![ConfigurationError::UnknownRule("nonexistent_999".to_string())]);
    }

    #[test]
    fn test_global_block_applies_to_every_rule() {
        let mut list = RuleList::new();
        let mut config = Config::default();
        config
            .rule
            .insert("global".to_string(), [("indentSize".to_string(), json!(4))].into_iter().collect());
        config
            .rule
            .insert("instantiation_012".to_string(), [("indentSize".to_string(), json!(3))].into_iter().collect());

        assert!(list.configure(&config).is_empty());
        assert_eq!(list.get("architecture_010").map(|r| r.base().indent_size), Some(4));
        assert_eq!(list.get("instantiation_012").map(|r| r.base().indent_size), Some(3));
    }

    #[test]
    fn test_skip_and_max_phase() {
        let list = RuleList::from_rules(vec![Box::new(context_ref::rule_002())]);
        let s = stream("context   c1;\n");

        assert_eq!(list.analyze(&s, &PhaseSelection::default()).violations.len(), 1);

        let skipped = PhaseSelection {
            skip_phases: vec![2],
            ..Default::default()
        };
        assert!(list.analyze(&s, &skipped).violations.is_empty());

        let capped = PhaseSelection {
            max_phase: 1,
            skip_phases: Vec::new(),
        };
        assert!(list.analyze(&s, &capped).violations.is_empty());
    }

    #[test]
    fn test_non_idempotent_rule_is_reported_and_isolated() {
        let list = RuleList::from_rules(vec![
            Box::new(Stubborn {
                base: RuleBase::new("stubborn", "001", 1, "Never satisfied.").with_groups(&["test"]),
            }),
            Box::new(context_ref::rule_002()),
        ]);
        let mut s = stream("context   c1;\n");

        let report = list.fix(&mut s, &PhaseSelection::default());

        assert_eq!(
            report.failures,
            vec![RuleError::NotIdempotent {
                rule: "stubborn_001".to_string(),
                remaining: 1,
            }]
        );
        // The other rule still ran
        assert_eq!(s.text(), "context c1;\n");
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations_at_line(1)[0].rule_id, "stubborn_001");
    }

    #[test]
    fn test_rule_documentation() {
        let docs = RuleList::new().rule_documentation();
        let doc = docs.iter().find(|d| d.id == "architecture_010").unwrap();
        assert_eq!(doc.phase, 1);
        assert!(doc.fixable);
        assert!(!doc.disabled);
        assert_eq!(doc.solution, "Add \"architecture\" keyword after \"end\" keyword.");
    }
}
