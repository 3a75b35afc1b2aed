//! Typed recipe options.
//!
//! Option values are decided at the schema boundary: the recipe's TOML types,
//! or `key=value` pairs from the command line. Everything downstream matches
//! on [`OptionValue`] instead of comparing strings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::RecipeError;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Parse a command-line value.
    ///
    /// `True`/`true` and `False`/`false` become booleans, anything else is
    /// kept verbatim.
    pub fn parse(s: &str) -> Self {
        match s {
            "True" | "true" => OptionValue::Bool(true),
            "False" | "false" => OptionValue::Bool(false),
            other => OptionValue::Str(other.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, OptionValue::Bool(_))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => write!(f, "True"),
            OptionValue::Bool(false) => write!(f, "False"),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

/// A `key=value` option override given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOverride {
    pub name: String,
    pub value: OptionValue,
}

impl FromStr for OptionOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `name=value`, got `{}`", s))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing option name in `{}`", s));
        }

        Ok(OptionOverride {
            name: name.to_string(),
            value: OptionValue::parse(value.trim()),
        })
    }
}

/// The full set of options for one build request.
///
/// Every option the recipe declares is always present; undeclared options
/// are accepted and passed through to the toolchain unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    /// Create an empty option set.
    pub fn new() -> Self {
        OptionSet {
            values: BTreeMap::new(),
        }
    }

    /// Build the option set for a request: recipe defaults overlaid with
    /// the caller's overrides.
    ///
    /// `reserved` names toolchain variables the recipe always sets; an option
    /// that would translate onto one of them is rejected.
    pub fn resolve(
        defaults: &BTreeMap<String, OptionValue>,
        overrides: &[OptionOverride],
        reserved: &[String],
    ) -> Result<Self, RecipeError> {
        let mut set = OptionSet::new();
        for (name, value) in defaults {
            set.insert(name, value.clone(), reserved)?;
        }

        for o in overrides {
            if let Some(default) = defaults.get(&o.name) {
                if default.is_bool() && !o.value.is_bool() {
                    return Err(RecipeError::configuration(format!(
                        "option `{}` is boolean, got `{}`",
                        o.name, o.value
                    )));
                }
            } else {
                tracing::debug!("passing through undeclared option `{}`", o.name);
            }
            set.insert(&o.name, o.value.clone(), reserved)?;
        }

        Ok(set)
    }

    /// Insert or replace an option.
    ///
    /// Fails if the name is not an identifier, or if its uppercased form
    /// collides with a different option or a reserved variable.
    pub fn insert(
        &mut self,
        name: &str,
        value: OptionValue,
        reserved: &[String],
    ) -> Result<(), RecipeError> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RecipeError::configuration(format!(
                "option name `{}` must contain only ASCII letters, digits and `_`",
                name
            )));
        }

        let upper = name.to_ascii_uppercase();
        if reserved.iter().any(|r| *r == upper) {
            return Err(RecipeError::configuration(format!(
                "option `{}` collides with the fixed toolchain variable `{}`",
                name, upper
            )));
        }

        if let Some(existing) = self
            .values
            .keys()
            .find(|k| k.as_str() != name && k.to_ascii_uppercase() == upper)
        {
            return Err(RecipeError::configuration(format!(
                "options `{}` and `{}` both translate to `{}`",
                existing, name, upper
            )));
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Look up a boolean option, falling back to `default` when the option
    /// is absent or not a boolean.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(OptionValue::as_bool).unwrap_or(default)
    }

    /// Whether the request selects shared linkage.
    pub fn shared(&self) -> bool {
        self.get_bool("shared", false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> BTreeMap<String, OptionValue> {
        let mut d = BTreeMap::new();
        d.insert("shared".to_string(), OptionValue::Bool(false));
        d.insert("fPIC".to_string(), OptionValue::Bool(true));
        d.insert("build_examples".to_string(), OptionValue::Bool(false));
        d.insert("build_testing".to_string(), OptionValue::Bool(false));
        d
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(OptionValue::parse("True"), OptionValue::Bool(true));
        assert_eq!(OptionValue::parse("false"), OptionValue::Bool(false));
        assert_eq!(
            OptionValue::parse("Release"),
            OptionValue::Str("Release".to_string())
        );
        // Only the two canonical spellings are booleans
        assert_eq!(OptionValue::parse("ON"), OptionValue::Str("ON".to_string()));
    }

    #[test]
    fn test_parse_override() {
        let o: OptionOverride = "shared=True".parse().unwrap();
        assert_eq!(o.name, "shared");
        assert_eq!(o.value, OptionValue::Bool(true));

        assert!("shared".parse::<OptionOverride>().is_err());
        assert!("=True".parse::<OptionOverride>().is_err());
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let set = OptionSet::resolve(&defaults(), &[], &[]).unwrap();
        assert_eq!(set.len(), 4);
        assert!(!set.shared());
        assert!(set.get_bool("fPIC", false));
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let overrides = vec![
            "shared=True".parse().unwrap(),
            "build_type=Release".parse().unwrap(),
        ];
        let set = OptionSet::resolve(&defaults(), &overrides, &[]).unwrap();
        assert!(set.shared());
        assert_eq!(set.get("build_type"), Some(&OptionValue::from("Release")));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_resolve_rejects_non_bool_for_declared_bool() {
        let overrides = vec!["shared=maybe".parse().unwrap()];
        let err = OptionSet::resolve(&defaults(), &overrides, &[]).unwrap_err();
        assert!(matches!(err, RecipeError::Configuration { .. }));
    }

    #[test]
    fn test_insert_rejects_case_collision() {
        let overrides = vec!["fpic=True".parse().unwrap()];
        let err = OptionSet::resolve(&defaults(), &overrides, &[]).unwrap_err();
        assert!(err.to_string().contains("FPIC"));
    }

    #[test]
    fn test_insert_rejects_reserved() {
        let reserved = vec!["BUILD_CXX".to_string()];
        let overrides = vec!["build_cxx=False".parse().unwrap()];
        assert!(OptionSet::resolve(&defaults(), &overrides, &reserved).is_err());
    }
}
