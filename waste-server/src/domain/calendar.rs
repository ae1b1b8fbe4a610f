//! Collection calendar records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{Field, FieldValue, Record};
use super::zip::Zip;

/// One scheduled collection: a date, a waste type and where it happens.
///
/// Depending on the source, the location is a postal code, a named
/// collection area, a tram stop, or some combination of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub waste_type: String,

    pub zip: Option<Zip>,

    pub area: Option<String>,

    pub station: Option<String>,

    pub region: String,
}

impl Record for CalendarRecord {
    const COLLECTION: &'static str = "calendar";

    const FIELDS: &'static [Field] = &[
        Field::Date,
        Field::Type,
        Field::Zip,
        Field::Area,
        Field::Station,
        Field::Region,
    ];

    fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Date => FieldValue::Date(self.date),
            Field::Type => Some(self.waste_type.as_str()).into(),
            Field::Zip => self
                .zip
                .map_or(FieldValue::Null, |z| FieldValue::Int(z.into())),
            Field::Area => self.area.as_deref().into(),
            Field::Station => self.station.as_deref().into(),
            Field::Region => Some(self.region.as_str()).into(),
            Field::Name | Field::Oil | Field::Glass | Field::Metal | Field::Textile => {
                FieldValue::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CalendarRecord {
        CalendarRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            waste_type: "organic".into(),
            zip: Some(Zip::parse("8001").unwrap()),
            area: Some("8001".into()),
            station: None,
            region: "zurich".into(),
        }
    }

    #[test]
    fn json_shape_keeps_nulls() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-01-09",
                "type": "organic",
                "zip": 8001,
                "area": "8001",
                "station": null,
                "region": "zurich",
            })
        );
    }

    #[test]
    fn missing_values_read_as_null() {
        let mut r = record();
        r.zip = None;
        assert!(r.value(Field::Zip).is_null());
        assert!(r.value(Field::Station).is_null());
        assert!(r.value(Field::Glass).is_null());
        assert_eq!(r.value(Field::Type), FieldValue::text("organic"));
    }
}
