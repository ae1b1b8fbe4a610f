//! Static descriptors for waste types, regions and calendar routes.

/// A waste type that can appear on a collection calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasteTypeDescriptor {
    /// URL slug, also the `type` value of calendar records
    pub slug: String,

    /// Human-readable name used in calendar feeds
    pub label: String,
}

impl WasteTypeDescriptor {
    pub fn new(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
        }
    }
}

/// A region with its own set of calendar routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// URL slug (`/api/region/{slug}/...`)
    pub slug: String,

    /// Display name
    pub label: String,

    /// Waste types collected in this region, in display order
    pub types: Vec<String>,

    /// Parameters removed from every route scoped to this region
    pub omit_params: Vec<String>,
}

impl RegionDescriptor {
    pub fn new(
        slug: impl Into<String>,
        label: impl Into<String>,
        types: &[&str],
        omit_params: &[&str],
    ) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            types: types.iter().map(|s| (*s).to_string()).collect(),
            omit_params: omit_params.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether the region collects the given waste type.
    pub fn has_type(&self, waste_type: &str) -> bool {
        self.types.iter().any(|t| t == waste_type)
    }
}

/// A calendar sub-resource: either one waste type or all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRouteDescriptor {
    /// Waste type served by the route; `None` for the all-types route
    pub waste_type: Option<String>,

    /// Notes shown in route listings and used as the feed title
    pub description: String,

    /// Parameters the route accepts, before region reduction
    pub params: Vec<String>,
}

impl CalendarRouteDescriptor {
    pub fn new(waste_type: Option<&str>, description: impl Into<String>, params: &[&str]) -> Self {
        Self {
            waste_type: waste_type.map(str::to_string),
            description: description.into(),
            params: params.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}
