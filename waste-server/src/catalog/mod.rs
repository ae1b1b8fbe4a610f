//! Static configuration: waste types, regions, calendar routes and the
//! global query parameter schema.
//!
//! A [`Catalog`] is built once at startup, validated, and then shared
//! read-only. Inconsistencies (a region naming an undeclared type, a route
//! listing an unknown parameter, ...) are reported as [`ConfigError`]
//! before any route is registered.

mod builtin;
mod error;
pub mod params;
mod region;

use std::collections::{BTreeMap, HashSet};

use crate::domain::{Field, ZIP_MAX, ZIP_MIN};

pub use builtin::builtin;
pub use error::ConfigError;
pub use params::{Binding, FilterOp, ParamDef, ParamRule, ParameterSchema};
pub use region::{CalendarRouteDescriptor, RegionDescriptor, WasteTypeDescriptor};

/// Validated, immutable configuration model.
#[derive(Debug, Clone)]
pub struct Catalog {
    types: Vec<WasteTypeDescriptor>,
    regions: BTreeMap<String, RegionDescriptor>,
    calendar_routes: Vec<CalendarRouteDescriptor>,
    station_params: Vec<String>,
    type_params: Vec<String>,
}

impl Catalog {
    /// Build and validate the built-in catalog.
    pub fn builtin() -> Result<Self, ConfigError> {
        builtin()
    }

    /// Regions keyed by slug, in slug order.
    pub fn regions(&self) -> &BTreeMap<String, RegionDescriptor> {
        &self.regions
    }

    /// Look up one region.
    pub fn region(&self, slug: &str) -> Option<&RegionDescriptor> {
        self.regions.get(slug)
    }

    /// Calendar routes in declaration order; the all-types route included.
    pub fn calendar_routes(&self) -> &[CalendarRouteDescriptor] {
        &self.calendar_routes
    }

    /// Every declared type slug, in declaration order.
    pub fn all_types(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.slug.as_str()).collect()
    }

    /// Display label of a waste type.
    pub fn type_label(&self, slug: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.slug == slug)
            .map(|t| t.label.as_str())
    }

    /// Parameters accepted by the station listing route.
    pub fn station_params(&self) -> &[String] {
        &self.station_params
    }

    /// Parameters accepted by the type listing route.
    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    /// The global parameter schema.
    ///
    /// `types` restricts the values accepted by the `types` parameter;
    /// `None` allows every declared type.
    pub fn parameter_schema(&self, types: Option<&[String]>) -> ParameterSchema {
        let allowed_types = match types {
            Some(types) => types.to_vec(),
            None => self.types.iter().map(|t| t.slug.clone()).collect(),
        };
        let region_slugs: Vec<String> = self.regions.keys().cloned().collect();

        let mut schema = ParameterSchema::new();
        schema.insert(
            "zip",
            ParamDef::filter(
                ParamRule::Integer {
                    min: ZIP_MIN,
                    max: Some(ZIP_MAX),
                    default: None,
                },
                Field::Zip,
                FilterOp::Exact,
            ),
        );
        schema.insert(
            "area",
            ParamDef::filter(ParamRule::Text, Field::Area, FilterOp::Exact),
        );
        schema.insert(
            "station",
            ParamDef::filter(ParamRule::Text, Field::Station, FilterOp::Exact),
        );
        schema.insert(
            "name",
            ParamDef::filter(ParamRule::Pattern, Field::Name, FilterOp::CaseInsensitive),
        );
        schema.insert(
            params::REGION,
            ParamDef::filter(
                ParamRule::Choice(region_slugs),
                Field::Region,
                FilterOp::Exact,
            ),
        );
        schema.insert(
            params::TYPES,
            ParamDef::filter(
                ParamRule::ChoiceList(allowed_types),
                Field::Type,
                FilterOp::AnyOf,
            ),
        );
        schema.insert(
            "start",
            ParamDef::filter(ParamRule::Date, Field::Date, FilterOp::AtLeast),
        );
        schema.insert(
            "end",
            ParamDef::filter(ParamRule::Date, Field::Date, FilterOp::AtMost),
        );
        for (name, field) in [
            ("oil", Field::Oil),
            ("glass", Field::Glass),
            ("metal", Field::Metal),
            ("textile", Field::Textile),
        ] {
            schema.insert(
                name,
                ParamDef::filter(ParamRule::Boolean, field, FilterOp::Boolean),
            );
        }
        schema.insert(params::SORT, ParamDef::new(ParamRule::Sort, Binding::Sort));
        schema.insert(
            params::OFFSET,
            ParamDef::new(
                ParamRule::Integer {
                    min: 0,
                    max: None,
                    default: Some(0),
                },
                Binding::Offset,
            ),
        );
        schema.insert(
            params::LIMIT,
            ParamDef::new(
                ParamRule::Integer {
                    min: 0,
                    max: None,
                    default: Some(params::DEFAULT_LIMIT),
                },
                Binding::Limit,
            ),
        );
        schema
    }

    /// Check internal consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        let declared: HashSet<&str> = self.types.iter().map(|t| t.slug.as_str()).collect();
        let schema = self.parameter_schema(None);

        let check_params = |owner: &str, names: &[String]| {
            names
                .iter()
                .find(|name| !schema.contains(name.as_str()))
                .map_or(Ok(()), |name| {
                    Err(ConfigError::UnknownParameter {
                        owner: owner.to_string(),
                        parameter: name.clone(),
                    })
                })
        };

        for region in self.regions.values() {
            let owner = format!("region '{}'", region.slug);
            if let Some(unknown) = region.types.iter().find(|t| !declared.contains(t.as_str())) {
                return Err(ConfigError::UnknownType {
                    owner,
                    waste_type: unknown.clone(),
                });
            }
            check_params(&owner, &region.omit_params)?;
            if !region.omit_params.iter().any(|p| p == params::REGION) {
                return Err(ConfigError::RegionScopeNotOmitted {
                    region: region.slug.clone(),
                });
            }
        }

        let mut all_types_routes = 0;
        for route in &self.calendar_routes {
            let owner = match &route.waste_type {
                Some(t) => format!("calendar route '{t}'"),
                None => "all-types calendar route".to_string(),
            };
            match &route.waste_type {
                Some(t) if !declared.contains(t.as_str()) => {
                    return Err(ConfigError::UnknownType {
                        owner,
                        waste_type: t.clone(),
                    });
                }
                Some(_) => {}
                None => all_types_routes += 1,
            }
            check_params(&owner, &route.params)?;
        }
        if all_types_routes != 1 {
            return Err(ConfigError::AllTypesRoute {
                count: all_types_routes,
            });
        }

        check_params("station route", &self.station_params)?;
        check_params("type listing route", &self.type_params)?;
        Ok(())
    }
}

/// Whether a slug is non-empty lowercase ASCII letters and underscores.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
}

/// Builder for a [`Catalog`].
///
/// Slug problems are collected while building and reported by
/// [`CatalogBuilder::build`] together with the consistency checks.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    types: Vec<WasteTypeDescriptor>,
    regions: Vec<RegionDescriptor>,
    calendar_routes: Vec<CalendarRouteDescriptor>,
    station_params: Vec<String>,
    type_params: Vec<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a waste type.
    pub fn waste_type(mut self, slug: &str, label: &str) -> Self {
        self.types.push(WasteTypeDescriptor::new(slug, label));
        self
    }

    /// Add a region.
    pub fn region(mut self, region: RegionDescriptor) -> Self {
        self.regions.push(region);
        self
    }

    /// Add a calendar route.
    pub fn calendar_route(
        mut self,
        waste_type: Option<&str>,
        description: impl Into<String>,
        params: &[&str],
    ) -> Self {
        self.calendar_routes
            .push(CalendarRouteDescriptor::new(waste_type, description, params));
        self
    }

    /// Set the station listing parameters.
    pub fn station_params(mut self, params: &[&str]) -> Self {
        self.station_params = params.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set the type listing parameters.
    pub fn type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Validate and build the catalog.
    pub fn build(self) -> Result<Catalog, ConfigError> {
        let mut seen = HashSet::new();
        for t in &self.types {
            if !is_valid_slug(&t.slug) {
                return Err(ConfigError::InvalidSlug {
                    kind: "type",
                    slug: t.slug.clone(),
                });
            }
            if !seen.insert(t.slug.clone()) {
                return Err(ConfigError::DuplicateSlug {
                    kind: "type",
                    slug: t.slug.clone(),
                });
            }
        }

        let mut regions = BTreeMap::new();
        for region in self.regions {
            if !is_valid_slug(&region.slug) {
                return Err(ConfigError::InvalidSlug {
                    kind: "region",
                    slug: region.slug,
                });
            }
            if regions.contains_key(&region.slug) {
                return Err(ConfigError::DuplicateSlug {
                    kind: "region",
                    slug: region.slug,
                });
            }
            regions.insert(region.slug.clone(), region);
        }

        let catalog = Catalog {
            types: self.types,
            regions,
            calendar_routes: self.calendar_routes,
            station_params: self.station_params,
            type_params: self.type_params,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}
