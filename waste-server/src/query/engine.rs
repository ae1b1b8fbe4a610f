//! Turns validated request parameters into store queries.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Binding, FilterOp};
use crate::domain::{CalendarRecord, Field, FieldValue, Record, StationRecord};
use crate::store::RecordStore;

use super::error::{QueryError, ValidationError};
use super::filter::{FieldFilter, FilterKind};
use super::params::{ParamValue, ValidatedParams};
use super::record_query::{Page, RecordQuery};

/// Implicit constraints a route places on every query it runs.
///
/// Scope filters are added by the route, never by the client, so they
/// cannot be overridden from the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub region: Option<&'a str>,
    pub waste_type: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new(region: Option<&'a str>, waste_type: Option<&'a str>) -> Self {
        Self { region, waste_type }
    }
}

/// Query engine over a record store.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn RecordStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// List stations.
    pub async fn stations(
        &self,
        params: &ValidatedParams,
        scope: Scope<'_>,
    ) -> Result<Page<StationRecord>, QueryError> {
        let query = build_query::<StationRecord>(params, scope)?;
        debug!(
            filters = query.filters.len(),
            offset = query.offset,
            limit = query.limit,
            "querying stations"
        );
        Ok(self.store.find_stations(&query).await?)
    }

    /// List calendar entries.
    pub async fn calendar(
        &self,
        params: &ValidatedParams,
        scope: Scope<'_>,
    ) -> Result<Page<CalendarRecord>, QueryError> {
        let query = build_query::<CalendarRecord>(params, scope)?;
        debug!(
            filters = query.filters.len(),
            offset = query.offset,
            limit = query.limit,
            "querying calendar"
        );
        Ok(self.store.find_calendar(&query).await?)
    }
}

/// Build the store query for record kind `R`.
///
/// Every check that can fail happens here, so a request that reaches the
/// store is well-formed.
pub fn build_query<R: Record>(
    params: &ValidatedParams,
    scope: Scope<'_>,
) -> Result<RecordQuery, ValidationError> {
    let mut filters = Vec::new();
    let mut sort = Vec::new();

    for (name, bound) in params.iter() {
        match bound.binding {
            Binding::Filter(field, op) => {
                if !R::FIELDS.contains(&field) {
                    return Err(ValidationError::new(
                        name,
                        bound.value.to_query_string(),
                        format!("not applicable to {}", R::COLLECTION),
                    ));
                }
                let kind = filter_kind(op, &bound.value).ok_or_else(|| {
                    ValidationError::new(
                        name,
                        bound.value.to_query_string(),
                        "value does not fit the parameter's filter",
                    )
                })?;
                filters.push(FieldFilter::new(field, kind));
            }
            Binding::Sort => {
                let ParamValue::Sort(keys) = &bound.value else {
                    return Err(ValidationError::new(
                        name,
                        bound.value.to_query_string(),
                        "expected sort keys",
                    ));
                };
                if let Some(key) = keys.iter().find(|k| !R::FIELDS.contains(&k.field)) {
                    return Err(ValidationError::new(
                        name,
                        bound.value.to_query_string(),
                        format!("cannot sort {} by '{}'", R::COLLECTION, key.field),
                    ));
                }
                sort.clone_from(keys);
            }
            Binding::Offset | Binding::Limit => {}
        }
    }

    check_ranges(params, &filters)?;

    if let Some(region) = scope.region {
        filters.push(FieldFilter::new(
            Field::Region,
            FilterKind::Exact(FieldValue::text(region)),
        ));
    }
    if let Some(waste_type) = scope.waste_type {
        filters.push(FieldFilter::new(
            Field::Type,
            FilterKind::Exact(FieldValue::text(waste_type)),
        ));
    }

    Ok(RecordQuery {
        filters,
        sort,
        offset: params.offset(),
        limit: params.limit(),
    })
}

/// Map a validated value onto the filter its binding asks for.
fn filter_kind(op: FilterOp, value: &ParamValue) -> Option<FilterKind> {
    let kind = match (op, value) {
        (FilterOp::Exact, ParamValue::Int(n)) => FilterKind::Exact(FieldValue::Int(*n)),
        (FilterOp::Exact, ParamValue::Text(s)) => FilterKind::Exact(FieldValue::text(s.as_str())),
        (FilterOp::Exact, ParamValue::Date(d)) => FilterKind::Exact(FieldValue::Date(*d)),
        (FilterOp::Boolean, ParamValue::Bool(b)) => FilterKind::BooleanEquals(*b),
        (FilterOp::CaseInsensitive, ParamValue::Pattern(re)) => {
            FilterKind::CaseInsensitiveMatch(re.clone())
        }
        (FilterOp::AnyOf, ParamValue::List(items)) => FilterKind::OneOf(
            items
                .iter()
                .map(|s| FieldValue::text(s.as_str()))
                .collect(),
        ),
        (FilterOp::AtLeast, ParamValue::Date(d)) => FilterKind::AtLeast(FieldValue::Date(*d)),
        (FilterOp::AtMost, ParamValue::Date(d)) => FilterKind::AtMost(FieldValue::Date(*d)),
        _ => return None,
    };
    Some(kind)
}

/// Reject a lower bound above an upper bound on the same field.
fn check_ranges(params: &ValidatedParams, filters: &[FieldFilter]) -> Result<(), ValidationError> {
    for lower in filters {
        let FilterKind::AtLeast(from) = &lower.kind else {
            continue;
        };
        for upper in filters.iter().filter(|f| f.field == lower.field) {
            let FilterKind::AtMost(until) = &upper.kind else {
                continue;
            };
            if from > until {
                let (name, value) = params
                    .iter()
                    .find(|(_, b)| b.binding == Binding::Filter(upper.field, FilterOp::AtMost))
                    .map(|(n, b)| (n.to_string(), b.value.to_query_string()))
                    .unwrap_or_else(|| (upper.field.to_string(), String::new()));
                return Err(ValidationError::new(
                    name,
                    value,
                    "range end is before range start",
                ));
            }
        }
    }
    Ok(())
}
