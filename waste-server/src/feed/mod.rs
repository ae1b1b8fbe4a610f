//! iCalendar rendering of calendar records.
//!
//! Each record becomes one all-day `VEVENT`. The UID is derived from the
//! record's natural key, so rendering the same records twice yields the
//! same events; only `DTSTAMP` changes between runs.

use chrono::{DateTime, Utc};
use ical::generator::Emitter;
use ical::parser::ical::component::{IcalCalendar, IcalEvent};
use ical::property::Property;

use crate::catalog::Catalog;
use crate::domain::CalendarRecord;

/// Content type of rendered feeds.
pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

const PRODID: &str = "-//waste-server//collection calendar//EN";
const UID_DOMAIN: &str = "waste-server";

/// Errors from feed rendering.
///
/// Records that passed import always render; these indicate a record that
/// does not match the catalog it is rendered against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("record on {date} has undeclared waste type '{waste_type}'")]
    UnknownType { date: String, waste_type: String },
}

/// Renders calendar records as an iCalendar document.
pub struct CalendarFeed<'a> {
    catalog: &'a Catalog,
    title: String,
    stamp: DateTime<Utc>,
}

impl<'a> CalendarFeed<'a> {
    /// Create a feed titled `title`, stamped with the current time.
    pub fn new(catalog: &'a Catalog, title: impl Into<String>) -> Self {
        Self {
            catalog,
            title: title.into(),
            stamp: Utc::now(),
        }
    }

    /// Use a fixed generation timestamp.
    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = stamp;
        self
    }

    /// Render the records in the given order.
    pub fn render(&self, records: &[CalendarRecord]) -> Result<String, FeedError> {
        let mut calendar = IcalCalendar::new();
        calendar.properties = vec![
            property("VERSION", "2.0"),
            property("PRODID", PRODID),
            property("CALSCALE", "GREGORIAN"),
            property("METHOD", "PUBLISH"),
            property("X-WR-CALNAME", &escape_text(&self.title)),
        ];

        for record in records {
            calendar.events.push(self.event(record)?);
        }

        Ok(calendar.generate())
    }

    fn event(&self, record: &CalendarRecord) -> Result<IcalEvent, FeedError> {
        let label =
            self.catalog
                .type_label(&record.waste_type)
                .ok_or_else(|| FeedError::UnknownType {
                    date: record.date.to_string(),
                    waste_type: record.waste_type.clone(),
                })?;

        let location = location(record);
        let summary = match location {
            Some(place) => format!("{label}, {place}"),
            None => label.to_string(),
        };

        let mut event = IcalEvent::new();
        event.properties.push(property("UID", &event_uid(record)));
        event.properties.push(property(
            "DTSTAMP",
            &self.stamp.format("%Y%m%dT%H%M%SZ").to_string(),
        ));
        event.properties.push(Property {
            name: "DTSTART".into(),
            params: Some(vec![("VALUE".into(), vec!["DATE".into()])]),
            value: Some(record.date.format("%Y%m%d").to_string()),
        });
        event.properties.push(property("SUMMARY", &escape_text(&summary)));
        event
            .properties
            .push(property("CATEGORIES", &escape_text(&record.waste_type)));
        if let Some(place) = location {
            event.properties.push(property("LOCATION", &escape_text(place)));
        }
        Ok(event)
    }
}

/// Stable event identifier built from date, type and location.
///
/// `<date>-<type>-<zip|region>[-<station|area>]@waste-server`
pub fn event_uid(record: &CalendarRecord) -> String {
    let mut uid = format!("{}-{}-", record.date.format("%Y%m%d"), record.waste_type);
    match record.zip {
        Some(zip) => uid.push_str(&zip.to_string()),
        None => uid.push_str(&slug(&record.region)),
    }
    if let Some(place) = location(record) {
        let place = slug(place);
        if !place.is_empty() {
            uid.push('-');
            uid.push_str(&place);
        }
    }
    uid.push('@');
    uid.push_str(UID_DOMAIN);
    uid
}

/// Station takes precedence over area.
fn location(record: &CalendarRecord) -> Option<&str> {
    record
        .station
        .as_deref()
        .or(record.area.as_deref())
        .filter(|s| !s.trim().is_empty())
}

/// Lowercase ASCII alphanumerics separated by single dashes.
fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Escape a TEXT value (RFC 5545 section 3.3.11).
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

fn property(name: &str, value: &str) -> Property {
    Property {
        name: name.to_string(),
        params: None,
        value: Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Zip;
    use chrono::{NaiveDate, TimeZone};

    fn record(waste_type: &str) -> CalendarRecord {
        CalendarRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            waste_type: waste_type.into(),
            zip: Some(Zip::parse("8001").unwrap()),
            area: None,
            station: None,
            region: "zurich".into(),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn lines(ics: &str) -> Vec<&str> {
        ics.lines().collect()
    }

    #[test]
    fn renders_calendar_header() {
        let catalog = Catalog::builtin().unwrap();
        let ics = CalendarFeed::new(&catalog, "Organic")
            .with_stamp(stamp())
            .render(&[])
            .unwrap();
        let lines = lines(&ics);

        assert_eq!(lines.first(), Some(&"BEGIN:VCALENDAR"));
        assert_eq!(lines.last(), Some(&"END:VCALENDAR"));
        assert!(lines.contains(&"VERSION:2.0"));
        assert!(lines.contains(&"METHOD:PUBLISH"));
        assert!(lines.contains(&"X-WR-CALNAME:Organic"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn one_all_day_event_per_record() {
        let catalog = Catalog::builtin().unwrap();
        let ics = CalendarFeed::new(&catalog, "All")
            .with_stamp(stamp())
            .render(&[record("organic"), record("paper")])
            .unwrap();
        let lines = lines(&ics);

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(lines.contains(&"DTSTART;VALUE=DATE:20240103"));
        assert!(lines.contains(&"SUMMARY:Organic waste"));
        assert!(lines.contains(&"SUMMARY:Paper"));
        assert!(lines.contains(&"CATEGORIES:organic"));
        assert!(lines.contains(&"DTSTAMP:20240101T120000Z"));
        assert!(!ics.contains("DTEND"));
    }

    #[test]
    fn missing_location_omits_property() {
        let catalog = Catalog::builtin().unwrap();
        let ics = CalendarFeed::new(&catalog, "t")
            .render(&[record("paper")])
            .unwrap();
        assert!(!ics.contains("LOCATION"));
    }

    #[test]
    fn station_appears_in_summary_and_location() {
        let catalog = Catalog::builtin().unwrap();
        let mut tram = record("cargotram");
        tram.station = Some("Hardplatz".into());
        let ics = CalendarFeed::new(&catalog, "t").render(&[tram]).unwrap();
        let lines = lines(&ics);

        assert!(lines.contains(&"SUMMARY:Cargo tram\\, Hardplatz"));
        assert!(lines.contains(&"LOCATION:Hardplatz"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let catalog = Catalog::builtin().unwrap();
        let records = [record("organic"), record("waste")];
        let feed = CalendarFeed::new(&catalog, "t").with_stamp(stamp());
        assert_eq!(
            feed.render(&records).unwrap(),
            feed.render(&records).unwrap()
        );
    }

    #[test]
    fn unknown_type_is_an_error() {
        let catalog = Catalog::builtin().unwrap();
        let err = CalendarFeed::new(&catalog, "t")
            .render(&[record("glitter")])
            .unwrap_err();
        assert_eq!(
            err,
            FeedError::UnknownType {
                date: "2024-01-03".into(),
                waste_type: "glitter".into(),
            }
        );
    }

    #[test]
    fn uid_from_natural_key() {
        let mut r = record("organic");
        assert_eq!(event_uid(&r), "20240103-organic-8001@waste-server");

        r.area = Some("Kreis 1 / Altstadt".into());
        assert_eq!(
            event_uid(&r),
            "20240103-organic-8001-kreis-1-altstadt@waste-server"
        );

        r.zip = None;
        r.station = Some("Hardplatz".into());
        assert_eq!(
            event_uid(&r),
            "20240103-organic-zurich-hardplatz@waste-server"
        );
    }

    #[test]
    fn escapes_text_values() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("  Zürich HB -- Süd "), "z-rich-hb-s-d");
        assert_eq!(slug("Hardplatz"), "hardplatz");
    }
}
