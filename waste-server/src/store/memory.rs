//! In-memory record store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{CalendarRecord, StationRecord};
use crate::query::{Page, RecordQuery};

use super::{Collection, RecordStore, StoreError};

/// Record store holding both collections in memory.
///
/// Readers share the lock; the import job is the only writer and runs
/// before the server accepts requests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    stations: Arc<RwLock<Vec<StationRecord>>>,
    calendar: Arc<RwLock<Vec<CalendarRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection.
    pub async fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Stations => self.stations.read().await.len(),
            Collection::Calendar => self.calendar.read().await.len(),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_stations(&self, query: &RecordQuery) -> Result<Page<StationRecord>, StoreError> {
        let guard = self.stations.read().await;
        Ok(query.run(guard.iter()))
    }

    async fn find_calendar(
        &self,
        query: &RecordQuery,
    ) -> Result<Page<CalendarRecord>, StoreError> {
        let guard = self.calendar.read().await;
        Ok(query.run(guard.iter()))
    }

    async fn insert_station(&self, record: StationRecord) -> Result<(), StoreError> {
        self.stations.write().await.push(record);
        Ok(())
    }

    async fn insert_calendar(&self, record: CalendarRecord) -> Result<(), StoreError> {
        self.calendar.write().await.push(record);
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        match collection {
            Collection::Stations => self.stations.write().await.clear(),
            Collection::Calendar => self.calendar.write().await.clear(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationKind, Zip};
    use chrono::NaiveDate;

    fn everything() -> RecordQuery {
        RecordQuery {
            filters: vec![],
            sort: vec![],
            offset: 0,
            limit: usize::MAX,
        }
    }

    fn entry() -> CalendarRecord {
        CalendarRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            waste_type: "paper".into(),
            zip: Some(Zip::parse("8003").unwrap()),
            area: None,
            station: None,
            region: "zurich".into(),
        }
    }

    #[tokio::test]
    async fn insert_find_clear() {
        let store = MemoryStore::new();
        store
            .insert_station(StationRecord {
                zip: Zip::parse("8003").unwrap(),
                name: "Zweierstrasse".into(),
                kind: StationKind::default(),
                region: "zurich".into(),
            })
            .await
            .unwrap();
        store.insert_calendar(entry()).await.unwrap();

        assert_eq!(store.len(Collection::Stations).await, 1);
        assert_eq!(store.find_calendar(&everything()).await.unwrap().total_count, 1);

        store.clear(Collection::Calendar).await.unwrap();
        assert_eq!(store.len(Collection::Calendar).await, 0);
        assert_eq!(store.len(Collection::Stations).await, 1);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let store = MemoryStore::new();
        store.insert_calendar(entry()).await.unwrap();
        store.insert_calendar(entry()).await.unwrap();

        let page = store.find_calendar(&everything()).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.rows[0], page.rows[1]);
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = MemoryStore::new();
        let reader = store.clone();
        store.insert_calendar(entry()).await.unwrap();
        assert_eq!(reader.len(Collection::Calendar).await, 1);
    }
}
