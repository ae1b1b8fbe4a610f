//! Validated query parameters.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;

use crate::catalog::Binding;
use crate::catalog::params::DEFAULT_LIMIT;

use super::sort::SortKey;

/// A parameter value after validation.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Pattern(Regex),
    Date(NaiveDate),
    List(Vec<String>),
    Sort(Vec<SortKey>),
}

impl ParamValue {
    /// Value as it would appear in a query string, for error messages.
    pub fn to_query_string(&self) -> String {
        match self {
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::Pattern(re) => re.as_str().to_string(),
            ParamValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            ParamValue::List(items) => items.join(","),
            ParamValue::Sort(keys) => keys
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// A validated value together with what the engine should do with it.
#[derive(Debug, Clone)]
pub struct BoundValue {
    pub binding: Binding,
    pub value: ParamValue,
}

/// Query parameters that passed a route's schema, defaults filled in.
#[derive(Debug, Clone, Default)]
pub struct ValidatedParams {
    values: BTreeMap<String, BoundValue>,
}

impl ValidatedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding, value: ParamValue) {
        self.values
            .insert(name.into(), BoundValue { binding, value });
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name).map(|b| &b.value)
    }

    /// Text value of a parameter, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows to skip; 0 when not given.
    pub fn offset(&self) -> usize {
        self.bound_int(Binding::Offset).unwrap_or(0)
    }

    /// Maximum rows to return; the default limit when not given.
    pub fn limit(&self) -> usize {
        self.bound_int(Binding::Limit)
            .unwrap_or(DEFAULT_LIMIT as usize)
    }

    fn bound_int(&self, binding: Binding) -> Option<usize> {
        self.values
            .values()
            .find(|b| b.binding == binding)
            .and_then(|b| match b.value {
                ParamValue::Int(n) => usize::try_from(n).ok(),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;
    use crate::query::sort::parse_sort;

    #[test]
    fn pagination_defaults() {
        let params = ValidatedParams::new();
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 500);
    }

    #[test]
    fn pagination_from_bound_values() {
        let mut params = ValidatedParams::new();
        params.insert("offset", Binding::Offset, ParamValue::Int(20));
        params.insert("limit", Binding::Limit, ParamValue::Int(5));
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 5);
    }

    #[test]
    fn text_lookup() {
        let mut params = ValidatedParams::new();
        params.insert(
            "region",
            Binding::Filter(Field::Region, crate::catalog::FilterOp::Exact),
            ParamValue::Text("zurich".into()),
        );
        assert_eq!(params.text("region"), Some("zurich"));
        assert_eq!(params.text("zip"), None);
    }

    #[test]
    fn query_string_rendering() {
        let sort = ParamValue::Sort(parse_sort("region,name:desc").unwrap());
        assert_eq!(sort.to_query_string(), "region,name:desc");
        let list = ParamValue::List(vec!["paper".into(), "cardboard".into()]);
        assert_eq!(list.to_query_string(), "paper,cardboard");
    }
}
