//! Route generation from the catalog.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;

use crate::catalog::{
    CalendarRouteDescriptor, Catalog, ConfigError, ParameterSchema, RegionDescriptor,
};

use super::descriptor::{Endpoint, JSON_ONLY, JSON_OR_ICAL, RouteDescriptor};

/// Prefix of every generated route.
pub const API_PREFIX: &str = "/api";

/// Immutable set of generated routes, indexed by method and path.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Arc<RouteDescriptor>>,
    index: HashMap<(Method, String), usize>,
}

impl RouteTable {
    fn insert(&mut self, route: RouteDescriptor) -> Result<(), ConfigError> {
        let key = (route.method.clone(), route.path.clone());
        if self.index.contains_key(&key) {
            return Err(ConfigError::DuplicateRoute {
                method: key.0.to_string(),
                path: key.1,
            });
        }
        self.index.insert(key, self.routes.len());
        self.routes.push(Arc::new(route));
        Ok(())
    }

    /// Route registered for exactly this method and suffix-free path.
    pub fn get(&self, method: &Method, path: &str) -> Option<&Arc<RouteDescriptor>> {
        self.index
            .get(&(method.clone(), path.to_string()))
            .map(|&i| &self.routes[i])
    }

    /// Match a request path, returning the route and the format suffix.
    pub fn resolve<'p>(
        &self,
        method: &Method,
        request_path: &'p str,
    ) -> Option<(&Arc<RouteDescriptor>, &'p str)> {
        let (path, extension) = split_format(request_path);
        self.get(method, path).map(|route| (route, extension))
    }

    /// Routes in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDescriptor>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Split `/a/b.ext` into `/a/b` and `.ext`.
///
/// Only the last path segment can carry a suffix.
pub fn split_format(path: &str) -> (&str, &str) {
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[segment_start..].rfind('.') {
        Some(dot) => path.split_at(segment_start + dot),
        None => (path, ""),
    }
}

/// Build the route for one calendar descriptor, optionally scoped to a region.
///
/// Returns `None` when the region does not collect the route's type.
pub fn calendar_route(
    catalog: &Catalog,
    region: Option<&RegionDescriptor>,
    route: &CalendarRouteDescriptor,
) -> Option<RouteDescriptor> {
    if let (Some(region), Some(waste_type)) = (region, &route.waste_type) {
        if !region.has_type(waste_type) {
            return None;
        }
    }

    let schema = catalog
        .parameter_schema(region.map(|r| r.types.as_slice()))
        .pick(route.params.iter().map(String::as_str));
    let params = match region {
        Some(region) => schema.omit(region.omit_params.iter().map(String::as_str)),
        None => schema,
    };

    let mut path = match region {
        Some(region) => format!("{API_PREFIX}/region/{}/calendar", region.slug),
        None => format!("{API_PREFIX}/calendar"),
    };
    if let Some(waste_type) = &route.waste_type {
        path.push('/');
        path.push_str(waste_type);
    }

    let description = match region {
        Some(region) => format!("{} ({})", route.description, region.label),
        None => route.description.clone(),
    };

    Some(RouteDescriptor {
        method: Method::GET,
        path,
        formats: JSON_OR_ICAL,
        params,
        endpoint: Endpoint::Calendar {
            region: region.map(|r| r.slug.clone()),
            waste_type: route.waste_type.clone(),
        },
        description,
    })
}

/// Generate every route the catalog describes.
///
/// Fails if two routes would share method and path.
pub fn generate(catalog: &Catalog) -> Result<RouteTable, ConfigError> {
    let mut table = RouteTable::default();

    for route in catalog.calendar_routes() {
        if let Some(descriptor) = calendar_route(catalog, None, route) {
            table.insert(descriptor)?;
        }
    }
    for region in catalog.regions().values() {
        for route in catalog.calendar_routes() {
            if let Some(descriptor) = calendar_route(catalog, Some(region), route) {
                table.insert(descriptor)?;
            }
        }
    }

    let schema = catalog.parameter_schema(None);
    table.insert(RouteDescriptor {
        method: Method::GET,
        path: format!("{API_PREFIX}/stations"),
        formats: JSON_ONLY,
        params: schema.pick(catalog.station_params().iter().map(String::as_str)),
        endpoint: Endpoint::Stations,
        description: "Collection stations".into(),
    })?;
    table.insert(RouteDescriptor {
        method: Method::GET,
        path: format!("{API_PREFIX}/parameter/regions"),
        formats: JSON_ONLY,
        params: ParameterSchema::new(),
        endpoint: Endpoint::Regions,
        description: "Region slugs".into(),
    })?;
    table.insert(RouteDescriptor {
        method: Method::GET,
        path: format!("{API_PREFIX}/parameter/types"),
        formats: JSON_ONLY,
        params: schema.pick(catalog.type_params().iter().map(String::as_str)),
        endpoint: Endpoint::Types,
        description: "Waste type slugs".into(),
    })?;

    Ok(table)
}
