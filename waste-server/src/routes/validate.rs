//! Query string validation against a route's parameter schema.

use std::collections::HashSet;

use regex::RegexBuilder;

use crate::catalog::{ParamRule, ParameterSchema};
use crate::domain::{parse_bool, parse_iso_date};
use crate::query::{ParamValue, ValidatedParams, ValidationError, parse_sort};

/// Upper bound on compiled `name` patterns.
const PATTERN_SIZE_LIMIT: usize = 1 << 16;

/// Check query pairs against `schema` and fill in defaults.
///
/// Parameters outside the schema and repeated parameters are rejected
/// rather than ignored.
pub fn validate_query(
    schema: &ParameterSchema,
    pairs: &[(String, String)],
) -> Result<ValidatedParams, ValidationError> {
    let mut params = ValidatedParams::new();
    let mut seen = HashSet::new();

    for (name, raw) in pairs {
        let def = schema
            .get(name)
            .ok_or_else(|| ValidationError::new(name, raw, "unknown parameter"))?;
        if !seen.insert(name.as_str()) {
            return Err(ValidationError::new(name, raw, "given more than once"));
        }
        let value = check_value(name, &def.rule, raw)?;
        params.insert(name.as_str(), def.binding, value);
    }

    for (name, def) in schema.iter() {
        if let ParamRule::Integer {
            default: Some(default),
            ..
        } = &def.rule
        {
            if !seen.contains(name) {
                params.insert(name, def.binding, ParamValue::Int(*default));
            }
        }
    }

    Ok(params)
}

fn check_value(name: &str, rule: &ParamRule, raw: &str) -> Result<ParamValue, ValidationError> {
    let invalid = |reason: String| ValidationError::new(name, raw, reason);

    match rule {
        ParamRule::Integer { min, max, .. } => {
            let n: i64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("expected an integer".into()))?;
            if n < *min {
                return Err(invalid(format!("must be at least {min}")));
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(invalid(format!("must be at most {max}")));
                }
            }
            Ok(ParamValue::Int(n))
        }
        ParamRule::Boolean => parse_bool(raw)
            .map(ParamValue::Bool)
            .ok_or_else(|| invalid("expected a boolean".into())),
        ParamRule::Text => Ok(ParamValue::Text(raw.to_string())),
        ParamRule::Pattern => RegexBuilder::new(raw)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map(ParamValue::Pattern)
            .map_err(|_| invalid("expected a regular expression".into())),
        ParamRule::Date => parse_iso_date(raw)
            .map(ParamValue::Date)
            .ok_or_else(|| invalid("expected a date as YYYY-MM-DD".into())),
        ParamRule::Choice(allowed) => {
            let value = raw.trim();
            if allowed.iter().any(|a| a == value) {
                Ok(ParamValue::Text(value.to_string()))
            } else {
                Err(invalid(format!("expected one of {}", allowed.join(", "))))
            }
        }
        ParamRule::ChoiceList(allowed) => {
            let items: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if items.is_empty() {
                return Err(invalid("expected at least one value".into()));
            }
            if let Some(unknown) = items.iter().find(|i| !allowed.contains(i)) {
                return Err(invalid(format!(
                    "'{unknown}' is not one of {}",
                    allowed.join(", ")
                )));
            }
            Ok(ParamValue::List(items))
        }
        ParamRule::Sort => parse_sort(raw).map(ParamValue::Sort),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Binding, Catalog};
    use crate::domain::Field;
    use crate::query::SortKey;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn station_schema() -> ParameterSchema {
        let catalog = Catalog::builtin().unwrap();
        catalog
            .parameter_schema(None)
            .pick(catalog.station_params().iter().map(String::as_str))
    }

    fn calendar_schema() -> ParameterSchema {
        let catalog = Catalog::builtin().unwrap();
        catalog.parameter_schema(None).pick([
            "zip", "area", "station", "types", "region", "start", "end", "sort", "offset",
            "limit",
        ])
    }

    #[test]
    fn defaults_filled_in() {
        let params = validate_query(&station_schema(), &[]).unwrap();
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 500);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn station_query_values() {
        let params = validate_query(
            &station_schema(),
            &pairs(&[
                ("region", "zurich"),
                ("glass", "TRUE"),
                ("zip", "8004"),
                ("name", "hard.*"),
                ("sort", "region,name:desc"),
                ("limit", "2"),
            ]),
        )
        .unwrap();

        assert_eq!(params.text("region"), Some("zurich"));
        assert!(matches!(params.get("glass"), Some(ParamValue::Bool(true))));
        assert!(matches!(params.get("zip"), Some(ParamValue::Int(8004))));
        match params.get("name") {
            Some(ParamValue::Pattern(re)) => assert!(re.is_match("HARDPLATZ")),
            other => panic!("expected pattern, got {other:?}"),
        }
        match params.get("sort") {
            Some(ParamValue::Sort(keys)) => assert_eq!(
                keys,
                &vec![SortKey::asc(Field::Region), SortKey::desc(Field::Name)]
            ),
            other => panic!("expected sort, got {other:?}"),
        }
        assert_eq!(params.limit(), 2);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn unknown_parameter_rejected() {
        let err = validate_query(&station_schema(), &pairs(&[("foo", "bar")])).unwrap_err();
        assert_eq!(err, ValidationError::new("foo", "bar", "unknown parameter"));
    }

    #[test]
    fn parameter_outside_route_rejected() {
        // a calendar parameter on the station route
        let err = validate_query(&station_schema(), &pairs(&[("start", "2024-01-01")]))
            .unwrap_err();
        assert_eq!(err.parameter, "start");
    }

    #[test]
    fn repeated_parameter_rejected() {
        let err = validate_query(
            &station_schema(),
            &pairs(&[("glass", "true"), ("glass", "false")]),
        )
        .unwrap_err();
        assert_eq!(err.reason, "given more than once");
    }

    #[test]
    fn zip_bounds() {
        let schema = station_schema();
        assert!(validate_query(&schema, &pairs(&[("zip", "1000")])).is_ok());
        assert!(validate_query(&schema, &pairs(&[("zip", "9999")])).is_ok());

        let err = validate_query(&schema, &pairs(&[("zip", "999")])).unwrap_err();
        assert_eq!(err.reason, "must be at least 1000");
        let err = validate_query(&schema, &pairs(&[("zip", "10000")])).unwrap_err();
        assert_eq!(err.reason, "must be at most 9999");
        let err = validate_query(&schema, &pairs(&[("zip", "80x1")])).unwrap_err();
        assert_eq!(err.reason, "expected an integer");
    }

    #[test]
    fn negative_pagination_rejected() {
        let schema = station_schema();
        assert!(validate_query(&schema, &pairs(&[("offset", "-1")])).is_err());
        assert!(validate_query(&schema, &pairs(&[("limit", "-5")])).is_err());
        let params = validate_query(&schema, &pairs(&[("limit", "0")])).unwrap();
        assert_eq!(params.limit(), 0);
    }

    #[test]
    fn bad_literals() {
        let schema = station_schema();
        for (name, value) in [
            ("glass", "maybe"),
            ("region", "atlantis"),
            ("name", "(unclosed"),
            ("sort", "colour"),
            ("sort", "name:sideways"),
        ] {
            let err = validate_query(&schema, &pairs(&[(name, value)])).unwrap_err();
            assert_eq!(err.parameter, name);
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn calendar_types_and_dates() {
        let params = validate_query(
            &calendar_schema(),
            &pairs(&[("types", "organic, paper"), ("start", "2024-01-01")]),
        )
        .unwrap();
        assert!(matches!(
            params.get("types"),
            Some(ParamValue::List(items)) if items == &vec!["organic".to_string(), "paper".to_string()]
        ));
        assert!(matches!(
            params.get("start"),
            Some(ParamValue::Date(d)) if *d == NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        ));

        let err =
            validate_query(&calendar_schema(), &pairs(&[("types", "organic,glitter")])).unwrap_err();
        assert!(err.reason.starts_with("'glitter' is not one of"));
        assert!(validate_query(&calendar_schema(), &pairs(&[("types", ",")])).is_err());
        assert!(validate_query(&calendar_schema(), &pairs(&[("end", "31.12.2024")])).is_err());
    }

    #[test]
    fn bindings_travel_with_values() {
        let params =
            validate_query(&calendar_schema(), &pairs(&[("station", "Hardplatz")])).unwrap();
        let (_, bound) = params.iter().find(|(n, _)| *n == "station").unwrap();
        assert_eq!(
            bound.binding,
            Binding::Filter(Field::Station, crate::catalog::FilterOp::Exact)
        );
    }

    proptest! {
        #[test]
        fn every_valid_zip_accepted(zip in 1000i64..=9999) {
            let params = validate_query(&station_schema(), &pairs(&[("zip", zip.to_string().as_str())])).unwrap();
            prop_assert!(matches!(params.get("zip"), Some(ParamValue::Int(n)) if *n == zip));
        }

        #[test]
        fn unknown_names_always_rejected(name in "[a-z]{1,12}") {
            let schema = station_schema();
            prop_assume!(!schema.contains(&name));
            let result = validate_query(&schema, &pairs(&[(name.as_str(), "1")]));
            prop_assert!(result.is_err());
        }
    }
}
