//! Recycling station records.

use serde::{Deserialize, Serialize};

use super::record::{Field, FieldValue, Record};
use super::zip::Zip;

/// Materials accepted at a recycling station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationKind {
    pub oil: bool,
    pub metal: bool,
    pub glass: bool,
    pub textile: bool,
}

/// A recycling collection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Postal code of the station
    pub zip: Zip,

    /// Street or place name
    pub name: String,

    /// Accepted materials
    pub kind: StationKind,

    /// Region slug
    pub region: String,
}

impl Record for StationRecord {
    const COLLECTION: &'static str = "stations";

    const FIELDS: &'static [Field] = &[
        Field::Zip,
        Field::Name,
        Field::Region,
        Field::Oil,
        Field::Glass,
        Field::Metal,
        Field::Textile,
    ];

    fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Zip => FieldValue::Int(self.zip.into()),
            Field::Name => Some(self.name.as_str()).into(),
            Field::Region => Some(self.region.as_str()).into(),
            Field::Oil => FieldValue::Bool(self.kind.oil),
            Field::Glass => FieldValue::Bool(self.kind.glass),
            Field::Metal => FieldValue::Bool(self.kind.metal),
            Field::Textile => FieldValue::Bool(self.kind.textile),
            Field::Date | Field::Type | Field::Area | Field::Station => FieldValue::Null,
        }
    }
}
