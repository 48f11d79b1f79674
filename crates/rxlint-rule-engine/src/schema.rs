//! Rule option schemas
//!
//! Options arrive as a JSON object (from `.rxlint.toml` or a test). Each rule
//! declares the fields it accepts; the engine validates options against the
//! schema before any file is analyzed, so rules can read them without
//! re-checking shapes.

use crate::rule::RuleOptions;
use crate::{Result, RuleError};
use serde_json::Value;

/// Accepted shape of one option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Boolean,
    String,
    /// Array of strings.
    StringList,
    /// Object mapping names to `true`, `false` or a reason string.
    BanMap,
}

impl OptionKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            OptionKind::Boolean => value.is_boolean(),
            OptionKind::String => value.is_string(),
            OptionKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            OptionKind::BanMap => value
                .as_object()
                .is_some_and(|map| map.values().all(|v| v.is_boolean() || v.is_string())),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            OptionKind::Boolean => "a boolean",
            OptionKind::String => "a string",
            OptionKind::StringList => "an array of strings",
            OptionKind::BanMap => "an object of `true`, `false` or reason strings",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OptionField {
    pub name: &'static str,
    pub kind: OptionKind,
    pub description: &'static str,
}

/// The set of options a rule accepts.
#[derive(Debug, Clone, Copy)]
pub struct OptionSchema {
    fields: &'static [OptionField],
}

impl OptionSchema {
    /// Schema of a rule without options.
    pub const EMPTY: OptionSchema = OptionSchema { fields: &[] };

    pub const fn new(fields: &'static [OptionField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [OptionField] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static OptionField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Reject unknown keys and values of the wrong shape.
    pub fn validate(&self, rule: &str, options: &RuleOptions) -> Result<()> {
        for (key, value) in options {
            let Some(field) = self.field(key) else {
                let message = if self.fields.is_empty() {
                    format!("unknown option '{}' (this rule takes no options)", key)
                } else {
                    let known: Vec<&str> = self.fields.iter().map(|f| f.name).collect();
                    format!("unknown option '{}' (expected one of: {})", key, known.join(", "))
                };
                return Err(RuleError::InvalidOptions {
                    rule: rule.to_string(),
                    message,
                });
            };

            if !field.kind.accepts(value) {
                return Err(RuleError::InvalidOptions {
                    rule: rule.to_string(),
                    message: format!("option '{}' must be {}", key, field.kind.describe()),
                });
            }
        }
        Ok(())
    }
}

/// Read a validated string list, or an empty list when absent.
pub fn string_list(options: &RuleOptions, name: &str) -> Vec<String> {
    options
        .get(name)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn boolean(options: &RuleOptions, name: &str) -> Option<bool> {
    options.get(name).and_then(Value::as_bool)
}

/// Read a validated ban map as `(name, reason)` pairs. Entries set to `false`
/// are left out.
pub fn ban_map(options: &RuleOptions, name: &str) -> Vec<(String, Option<String>)> {
    let Some(map) = options.get(name).and_then(Value::as_object) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, value)| match value {
            Value::Bool(true) => Some((key.clone(), None)),
            Value::String(reason) => Some((key.clone(), Some(reason.clone()))),
            _ => None,
        })
        .collect()
}
