//! Record store adapter.
//!
//! The server only reads: [`RecordStore::find_stations`] and
//! [`RecordStore::find_calendar`] filter, sort, count and paginate. The
//! write half ([`RecordStore::clear`] and the `insert_*` methods) exists
//! for the import job that fills the store before serving starts.

mod error;
pub mod import;
mod memory;

use async_trait::async_trait;

use crate::domain::{CalendarRecord, StationRecord};
use crate::query::{Page, RecordQuery};

pub use error::StoreError;
pub use memory::MemoryStore;

/// A stored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Stations,
    Calendar,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Stations => "stations",
            Collection::Calendar => "calendar",
        }
    }
}

/// Query-able persistence for stations and calendar entries.
///
/// Implementations must be safe for concurrent readers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run a query against the station collection.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot answer.
    async fn find_stations(&self, query: &RecordQuery) -> Result<Page<StationRecord>, StoreError>;

    /// Run a query against the calendar collection.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot answer.
    async fn find_calendar(&self, query: &RecordQuery)
    -> Result<Page<CalendarRecord>, StoreError>;

    /// Add one station.
    async fn insert_station(&self, record: StationRecord) -> Result<(), StoreError>;

    /// Add one calendar entry. Duplicates are kept.
    async fn insert_calendar(&self, record: CalendarRecord) -> Result<(), StoreError>;

    /// Remove every record from a collection.
    async fn clear(&self, collection: Collection) -> Result<(), StoreError>;
}
