use rxlint_core::Severity;
use rxlint_rule_engine::{built_in_rules, RuleConfig, RuleOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// rxlint configuration loaded from `.rxlint.toml`.
///
/// ```toml
/// type_information = true
/// ignore = ["**/generated/**"]
///
/// [rules]
/// no-nested-subscribe = "error"
/// no-unsafe-takeuntil = { level = "warn", options = { allow = ["share"] } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RxlintConfig {
    /// Run the declaration-based type provider. Rules that need types
    /// report nothing when this is off.
    #[serde(default = "default_true")]
    pub type_information: bool,

    /// Glob patterns excluded from file discovery.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Per-rule overrides. Built-in rules not listed here run at their
    /// default severity.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

impl Default for RxlintConfig {
    fn default() -> Self {
        Self {
            type_information: true,
            ignore: Vec::new(),
            rules: BTreeMap::new(),
        }
    }
}

/// How loudly a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(Severity::Warn),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

impl From<Severity> for RuleLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warn => RuleLevel::Warn,
            Severity::Error => RuleLevel::Error,
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLevel::Off => f.write_str("off"),
            RuleLevel::Warn => f.write_str("warn"),
            RuleLevel::Error => f.write_str("error"),
        }
    }
}

/// A rule entry: either just a level or a level with options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    Level(RuleLevel),
    Detailed {
        level: RuleLevel,
        #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
        options: RuleOptions,
    },
}

impl RuleSetting {
    pub fn level(&self) -> RuleLevel {
        match self {
            RuleSetting::Level(level) | RuleSetting::Detailed { level, .. } => *level,
        }
    }

    pub fn options(&self) -> RuleOptions {
        match self {
            RuleSetting::Level(_) => RuleOptions::new(),
            RuleSetting::Detailed { options, .. } => options.clone(),
        }
    }
}

impl RxlintConfig {
    /// A config listing every built-in rule at its default level.
    pub fn with_all_rules() -> Self {
        let rules = built_in_rules()
            .iter()
            .map(|entry| {
                let level = RuleLevel::from(entry.meta().default_severity);
                (entry.name().to_string(), RuleSetting::Level(level))
            })
            .collect();
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Rule names in `[rules]` that are not built in.
    pub fn unknown_rules(&self) -> Vec<&str> {
        self.rules
            .keys()
            .filter(|name| !built_in_rules().iter().any(|entry| entry.name() == name.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Enabled rules in catalogue order.
    ///
    /// Callers should reject [`unknown_rules`](Self::unknown_rules) first;
    /// they are skipped here.
    pub fn rule_configs(&self) -> Vec<RuleConfig> {
        built_in_rules()
            .iter()
            .filter_map(|entry| {
                let (level, options) = match self.rules.get(entry.name()) {
                    Some(setting) => (setting.level(), setting.options()),
                    None => (
                        RuleLevel::from(entry.meta().default_severity),
                        RuleOptions::new(),
                    ),
                };
                level.severity().map(|severity| RuleConfig {
                    name: entry.name().to_string(),
                    severity,
                    options,
                })
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}
