//! The built-in catalog of waste types, regions and calendar routes.

use super::{Catalog, CatalogBuilder, ConfigError, RegionDescriptor};

/// Parameters common to every calendar route.
const CALENDAR_COMMON: [&str; 6] = ["region", "start", "end", "sort", "offset", "limit"];

/// Waste types whose calendars are published per postal code or area.
const AREA_TYPES: [&str; 9] = [
    "organic",
    "cardboard",
    "paper",
    "waste",
    "textile",
    "incombustibles",
    "chipping",
    "metal",
    "bulky_goods",
];

/// Waste types collected at named stops.
const STATION_TYPES: [&str; 3] = ["cargotram", "etram", "special"];

fn calendar_params(extra: &[&'static str]) -> Vec<&'static str> {
    extra.iter().copied().chain(CALENDAR_COMMON).collect()
}

/// Build and validate the built-in catalog.
pub fn builtin() -> Result<Catalog, ConfigError> {
    let mut builder = CatalogBuilder::new()
        .waste_type("organic", "Organic waste")
        .waste_type("cargotram", "Cargo tram")
        .waste_type("etram", "E-tram")
        .waste_type("cardboard", "Cardboard")
        .waste_type("paper", "Paper")
        .waste_type("waste", "Household waste")
        .waste_type("special", "Special waste")
        .waste_type("textile", "Textiles")
        .waste_type("incombustibles", "Incombustibles")
        .waste_type("chipping", "Chipping service")
        .waste_type("metal", "Metal")
        .waste_type("bulky_goods", "Bulky goods")
        .calendar_route(
            None,
            "Collection dates for all waste types",
            &calendar_params(&["zip", "area", "station", "types"]),
        );

    for waste_type in AREA_TYPES {
        builder = builder.calendar_route(
            Some(waste_type),
            format!("Collection dates for {waste_type}, by zip code or area"),
            &calendar_params(&["zip", "area"]),
        );
    }
    for waste_type in STATION_TYPES {
        builder = builder.calendar_route(
            Some(waste_type),
            format!("Collection dates for {waste_type}, by zip code or stop"),
            &calendar_params(&["zip", "station"]),
        );
    }

    builder
        .region(RegionDescriptor::new(
            "basel",
            "Basel",
            &["cardboard", "paper", "waste", "organic"],
            &["region", "station"],
        ))
        .region(RegionDescriptor::new(
            "bern",
            "Bern",
            &["organic", "cardboard", "paper", "waste", "special", "metal"],
            &["region", "station"],
        ))
        .region(RegionDescriptor::new(
            "stgallen",
            "St. Gallen",
            &["organic", "cardboard", "paper", "waste", "metal", "textile"],
            &["region", "station"],
        ))
        .region(RegionDescriptor::new(
            "uster",
            "Uster",
            &[
                "organic",
                "cardboard",
                "paper",
                "waste",
                "metal",
                "textile",
                "chipping",
                "bulky_goods",
            ],
            &["region", "station"],
        ))
        .region(RegionDescriptor::new(
            "winterthur",
            "Winterthur",
            &[
                "organic",
                "cardboard",
                "paper",
                "waste",
                "metal",
                "textile",
                "incombustibles",
            ],
            &["region", "station"],
        ))
        .region(RegionDescriptor::new(
            "zurich",
            "Zürich",
            &[
                "organic",
                "cargotram",
                "etram",
                "cardboard",
                "paper",
                "waste",
                "special",
                "textile",
            ],
            &["region"],
        ))
        .station_params(&[
            "region", "zip", "name", "glass", "oil", "metal", "textile", "sort", "offset", "limit",
        ])
        .type_params(&["region"])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_consistent() {
        let catalog = builtin().unwrap();
        assert_eq!(catalog.all_types().len(), 12);
        assert_eq!(catalog.regions().len(), 6);
        // One route per type plus the all-types route
        assert_eq!(catalog.calendar_routes().len(), 13);
    }

    #[test]
    fn every_type_has_a_calendar_route() {
        let catalog = builtin().unwrap();
        for waste_type in catalog.all_types() {
            assert!(
                catalog
                    .calendar_routes()
                    .iter()
                    .any(|r| r.waste_type.as_deref() == Some(waste_type)),
                "no route for {waste_type}"
            );
        }
    }

    #[test]
    fn zurich_types_in_configured_order() {
        let catalog = builtin().unwrap();
        let zurich = catalog.region("zurich").unwrap();
        assert_eq!(
            zurich.types,
            vec![
                "organic",
                "cargotram",
                "etram",
                "cardboard",
                "paper",
                "waste",
                "special",
                "textile"
            ]
        );
        assert_eq!(zurich.label, "Zürich");
    }
}
