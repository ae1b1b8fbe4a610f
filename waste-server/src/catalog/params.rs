//! Query parameter schema.
//!
//! A [`ParameterSchema`] maps parameter names to the rule their values must
//! satisfy and to what the query engine does with the validated value.
//! Routes never build schemas from scratch: each one is a projection
//! ([`ParameterSchema::pick`] / [`ParameterSchema::omit`]) of the global
//! schema returned by [`Catalog::parameter_schema`](super::Catalog::parameter_schema).

use std::collections::BTreeMap;

use crate::domain::Field;

/// Name of the region filter parameter.
pub const REGION: &str = "region";
/// Name of the multi-type filter parameter.
pub const TYPES: &str = "types";
/// Name of the sort parameter.
pub const SORT: &str = "sort";
/// Name of the offset parameter.
pub const OFFSET: &str = "offset";
/// Name of the limit parameter.
pub const LIMIT: &str = "limit";

/// Default number of rows returned per request.
pub const DEFAULT_LIMIT: i64 = 500;

/// Validation rule for a single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamRule {
    /// Decimal integer within bounds, with an optional default.
    Integer {
        min: i64,
        max: Option<i64>,
        default: Option<i64>,
    },
    /// `true`/`false` and the usual aliases.
    Boolean,
    /// Free text, passed through unchanged.
    Text,
    /// Regular expression, matched case-insensitively.
    Pattern,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// Exactly one of the allowed values.
    Choice(Vec<String>),
    /// Comma-separated list of allowed values.
    ChoiceList(Vec<String>),
    /// Comma-separated `field[:asc|:desc]` sort keys.
    Sort,
}

/// How a filter parameter constrains a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Exact,
    Boolean,
    CaseInsensitive,
    AnyOf,
    AtLeast,
    AtMost,
}

/// What the query engine does with a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Filter(Field, FilterOp),
    Sort,
    Offset,
    Limit,
}

/// A parameter's rule and binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    pub rule: ParamRule,
    pub binding: Binding,
}

impl ParamDef {
    pub fn new(rule: ParamRule, binding: Binding) -> Self {
        Self { rule, binding }
    }

    /// Shorthand for a filter parameter.
    pub fn filter(rule: ParamRule, field: Field, op: FilterOp) -> Self {
        Self::new(rule, Binding::Filter(field, op))
    }
}

/// Mapping from parameter name to its definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    params: BTreeMap<String, ParamDef>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, def: ParamDef) {
        self.params.insert(name.into(), def);
    }

    pub fn get(&self, name: &str) -> Option<&ParamDef> {
        self.params.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDef)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Keep only the named parameters. Names not in the schema are ignored.
    pub fn pick<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let params = names
            .into_iter()
            .filter_map(|name| {
                self.params
                    .get_key_value(name)
                    .map(|(k, v)| (k.clone(), v.clone()))
            })
            .collect();
        Self { params }
    }

    /// Drop the named parameters.
    pub fn omit<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut params = self.params.clone();
        for name in names {
            params.remove(name);
        }
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ParameterSchema {
        let mut schema = ParameterSchema::new();
        schema.insert(
            "zip",
            ParamDef::filter(
                ParamRule::Integer {
                    min: 1000,
                    max: Some(9999),
                    default: None,
                },
                Field::Zip,
                FilterOp::Exact,
            ),
        );
        schema.insert(
            "name",
            ParamDef::filter(ParamRule::Pattern, Field::Name, FilterOp::CaseInsensitive),
        );
        schema.insert(SORT, ParamDef::new(ParamRule::Sort, Binding::Sort));
        schema
    }

    #[test]
    fn pick_keeps_known_names_only() {
        let picked = schema().pick(["zip", "sort", "nonexistent"]);
        assert_eq!(picked.names().collect::<Vec<_>>(), vec!["sort", "zip"]);
    }

    #[test]
    fn omit_removes_names() {
        let omitted = schema().omit(["zip", "nonexistent"]);
        assert_eq!(omitted.names().collect::<Vec<_>>(), vec!["name", "sort"]);
    }

    #[test]
    fn pick_then_omit_is_set_difference() {
        let s = schema();
        let result = s.pick(["zip", "name"]).omit(["name"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("zip"), s.get("zip"));
    }
}
