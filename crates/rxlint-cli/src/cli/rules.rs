//! Rule selection and the `--list-rules` catalogue.

use anyhow::{bail, Result};
use colored::*;
use rxlint_config::{RuleLevel, RxlintConfig};
use rxlint_core::Severity;
use rxlint_rule_engine::{built_in_rules, find_rule, RuleCategory, RuleConfig, RuleMeta};

/// Rules to run for this invocation.
///
/// Without `only`, this is every rule the configuration enables. With `only`,
/// exactly the named rules run: a rule the configuration turns off runs at
/// its default severity, otherwise the configured severity and options apply.
pub fn select_rules(config: &RxlintConfig, only: &[String]) -> Result<Vec<RuleConfig>> {
    if only.is_empty() {
        return Ok(config.rule_configs());
    }

    for name in only {
        if find_rule(name).is_none() {
            bail!("Unknown rule '{}'. Run with --list-rules to see available rules.", name);
        }
    }

    let selected = built_in_rules()
        .iter()
        .filter(|entry| only.iter().any(|name| name == entry.name()))
        .map(|entry| {
            let setting = config.rules.get(entry.name());
            let severity = setting
                .and_then(|s| s.level().severity())
                .unwrap_or(entry.meta().default_severity);
            RuleConfig {
                name: entry.name().to_string(),
                severity,
                options: setting.map(|s| s.options()).unwrap_or_default(),
            }
        })
        .collect();
    Ok(selected)
}

/// Print every built-in rule with its effective level under `config`.
pub fn print_rule_list(config: &RxlintConfig) {
    println!("{}", "Available rules:".bold());
    println!();

    let width = built_in_rules()
        .iter()
        .map(|entry| entry.name().len())
        .max()
        .unwrap_or(0);

    for entry in built_in_rules() {
        let meta = entry.meta();
        let level = config
            .rules
            .get(meta.name)
            .map(|setting| setting.level())
            .unwrap_or_else(|| RuleLevel::from(meta.default_severity));

        println!(
            "  {:<width$}  {:<5}  {:<11}  {}",
            meta.name.cyan(),
            colored_level(level),
            category_name(meta.category),
            meta.description,
            width = width
        );

        let flags = rule_flags(meta);
        if !flags.is_empty() {
            println!("  {:<width$}  {}", "", flags.join(", ").bright_black(), width = width);
        }
    }

    println!();
    println!(
        "{}",
        "Rules marked 'types' report nothing when run with --no-type-info.".bright_black()
    );
}

fn colored_level(level: RuleLevel) -> ColoredString {
    match level {
        RuleLevel::Off => "off".bright_black(),
        RuleLevel::Warn => "warn".yellow(),
        RuleLevel::Error => "error".red(),
    }
}

fn category_name(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Correctness => "correctness",
        RuleCategory::Suspicious => "suspicious",
        RuleCategory::Restriction => "restriction",
        RuleCategory::Style => "style",
    }
}

fn rule_flags(meta: &RuleMeta) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if meta.requires_type_information {
        flags.push("types");
    }
    if meta.fixable {
        flags.push("fixable");
    }
    if meta.has_suggestions {
        flags.push("suggestions");
    }
    flags
}

/// Severity label used by the human formatter.
pub fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warn => "warning".yellow().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxlint_config::RuleSetting;
    use serde_json::json;

    #[test]
    fn test_no_filter_uses_config() {
        let mut config = RxlintConfig::default();
        config
            .rules
            .insert("no-create".into(), RuleSetting::Level(RuleLevel::Off));

        let rules = select_rules(&config, &[]).unwrap();
        assert_eq!(rules.len(), built_in_rules().len() - 1);
        assert!(rules.iter().all(|r| r.name != "no-create"));
    }

    #[test]
    fn test_filter_runs_named_rules_only() {
        let config = RxlintConfig::default();
        let rules = select_rules(&config, &["no-internal".into(), "no-create".into()]).unwrap();
        let names: Vec<_> = rules.iter().map(|r| r.name.as_str()).collect();
        // Catalogue order, not argument order.
        assert_eq!(names, ["no-internal", "no-create"]);
    }

    #[test]
    fn test_filter_enables_rule_turned_off_in_config() {
        let mut config = RxlintConfig::default();
        config
            .rules
            .insert("no-create".into(), RuleSetting::Level(RuleLevel::Off));

        let rules = select_rules(&config, &["no-create".into()]).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].severity,
            find_rule("no-create").unwrap().meta().default_severity
        );
    }

    #[test]
    fn test_filter_keeps_configured_options() {
        let mut config = RxlintConfig::default();
        let options = json!({"allow": ["share"]}).as_object().cloned().unwrap();
        config.rules.insert(
            "no-unsafe-takeuntil".into(),
            RuleSetting::Detailed {
                level: RuleLevel::Warn,
                options: options.clone(),
            },
        );

        let rules = select_rules(&config, &["no-unsafe-takeuntil".into()]).unwrap();
        assert_eq!(rules[0].severity, Severity::Warn);
        assert_eq!(rules[0].options, options);
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let err = select_rules(&RxlintConfig::default(), &["no-such-rule".into()]).unwrap_err();
        assert!(err.to_string().contains("no-such-rule"));
    }
}
