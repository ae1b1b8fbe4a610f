//! Field-level view of stored records.
//!
//! The query engine never inspects record structs directly. It asks a
//! [`Record`] for the value of a [`Field`] and compares [`FieldValue`]s,
//! which keeps filtering and sorting independent of the record kind.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;

/// A queryable field of a station or calendar record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Zip,
    Name,
    Region,
    Oil,
    Glass,
    Metal,
    Textile,
    Date,
    Type,
    Area,
    Station,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Field; 11] = [
        Field::Zip,
        Field::Name,
        Field::Region,
        Field::Oil,
        Field::Glass,
        Field::Metal,
        Field::Textile,
        Field::Date,
        Field::Type,
        Field::Area,
        Field::Station,
    ];

    /// The field's name as used in query strings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Zip => "zip",
            Field::Name => "name",
            Field::Region => "region",
            Field::Oil => "oil",
            Field::Glass => "glass",
            Field::Metal => "metal",
            Field::Textile => "textile",
            Field::Date => "date",
            Field::Type => "type",
            Field::Area => "area",
            Field::Station => "station",
        }
    }

    /// Look up a field by name.
    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a field on one record, or a value to compare against.
///
/// Ordering puts `Null` first, so missing values sort before present ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Date(NaiveDate),
    Text(Cow<'a, str>),
}

impl FieldValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Owned text value.
    pub fn text(s: impl Into<String>) -> FieldValue<'static> {
        FieldValue::Text(Cow::Owned(s.into()))
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Null, |s| FieldValue::Text(Cow::Borrowed(s)))
    }
}

/// A record kind the query engine can filter and sort.
pub trait Record: Clone + Send + Sync + 'static {
    /// Name of the collection holding this kind of record.
    const COLLECTION: &'static str;

    /// Fields this record kind exposes, which is also the sort allow-list.
    const FIELDS: &'static [Field];

    /// Value of `field` on this record. Fields outside [`Record::FIELDS`]
    /// read as `Null`.
    fn value(&self, field: Field) -> FieldValue<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
        assert_eq!(Field::parse("colour"), None);
        assert_eq!(Field::parse("Zip"), None);
    }

    #[test]
    fn null_sorts_first() {
        assert!(FieldValue::Null < FieldValue::Int(0));
        assert!(FieldValue::Null < FieldValue::text(""));
    }

    #[test]
    fn borrowed_and_owned_text_compare_equal() {
        let owned = FieldValue::text("zurich");
        let borrowed: FieldValue<'_> = Some("zurich").into();
        assert_eq!(owned, borrowed);
    }
}
