//! Snapshot import from normalized CSV files.
//!
//! The offline conversion job writes one directory per region:
//!
//! - `<region>.csv` with `region,zip,area,station,waste_type,col_date`
//! - `<region>_stationen.csv` with `region,zip,name,oil,glass,metal,textile`
//!
//! Importing clears both collections and inserts every row that is valid
//! against the catalog. Invalid rows are logged and skipped. Files are read
//! on the blocking pool.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::domain::{
    CalendarRecord, StationKind, StationRecord, Zip, parse_bool, parse_iso_date,
};

use super::{Collection, RecordStore, StoreError};

/// Errors that abort an import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("import task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Counts from one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub stations: usize,
    pub calendar: usize,
    pub skipped: usize,
}

/// Calendar row as written by the conversion job.
#[derive(Debug, Deserialize)]
struct CalendarRow {
    region: String,
    #[serde(default)]
    zip: String,
    #[serde(default)]
    area: String,
    #[serde(default)]
    station: String,
    waste_type: String,
    col_date: String,
}

/// Station row as written by the conversion job.
#[derive(Debug, Deserialize)]
struct StationRow {
    region: String,
    zip: String,
    name: String,
    oil: String,
    glass: String,
    metal: String,
    textile: String,
}

/// Rows read from one snapshot file.
#[derive(Debug)]
enum FileRows {
    Stations(Vec<StationRow>),
    Calendar(Vec<CalendarRow>),
}

/// One parsed snapshot file and the number of rows it could not parse.
#[derive(Debug)]
struct SnapshotFile {
    path: PathBuf,
    rows: FileRows,
    malformed: usize,
}

impl SnapshotFile {
    fn collection(&self) -> Collection {
        match self.rows {
            FileRows::Stations(_) => Collection::Stations,
            FileRows::Calendar(_) => Collection::Calendar,
        }
    }
}

/// Replace the store contents with the CSV files under `dir`.
///
/// A missing directory leaves the store empty. Rows that cannot be parsed
/// or do not match the catalog are skipped; only unreadable files abort.
pub async fn import_dir(
    store: &dyn RecordStore,
    catalog: &Catalog,
    dir: &Path,
) -> Result<ImportSummary, ImportError> {
    let owned_dir = dir.to_path_buf();
    let files = tokio::task::spawn_blocking(move || load_snapshot(&owned_dir)).await??;

    store.clear(Collection::Stations).await?;
    store.clear(Collection::Calendar).await?;

    let mut summary = ImportSummary::default();
    let Some(files) = files else {
        warn!(dir = %dir.display(), "data directory not found, serving an empty store");
        return Ok(summary);
    };

    for file in files {
        let collection = file.collection();
        let path = file.path;
        summary.skipped += file.malformed;

        match file.rows {
            FileRows::Stations(rows) => {
                for row in rows {
                    match station_from_row(row, catalog) {
                        Ok(record) => {
                            store.insert_station(record).await?;
                            summary.stations += 1;
                        }
                        Err(reason) => {
                            warn!(
                                file = %path.display(),
                                collection = collection.as_str(),
                                %reason,
                                "skipping row"
                            );
                            summary.skipped += 1;
                        }
                    }
                }
            }
            FileRows::Calendar(rows) => {
                for row in rows {
                    match calendar_from_row(row, catalog) {
                        Ok(record) => {
                            store.insert_calendar(record).await?;
                            summary.calendar += 1;
                        }
                        Err(reason) => {
                            warn!(
                                file = %path.display(),
                                collection = collection.as_str(),
                                %reason,
                                "skipping row"
                            );
                            summary.skipped += 1;
                        }
                    }
                }
            }
        }
    }

    info!(
        stations = summary.stations,
        calendar = summary.calendar,
        skipped = summary.skipped,
        "import finished"
    );
    Ok(summary)
}

/// Read every snapshot file under `dir`. Blocking.
///
/// Returns `None` when `dir` does not exist.
fn load_snapshot(dir: &Path) -> Result<Option<Vec<SnapshotFile>>, ImportError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut files = Vec::new();
    for path in csv_files(dir)? {
        let (rows, malformed) = if is_station_file(&path) {
            let (rows, malformed) = read_rows::<StationRow>(&path)?;
            (FileRows::Stations(rows), malformed)
        } else {
            let (rows, malformed) = read_rows::<CalendarRow>(&path)?;
            (FileRows::Calendar(rows), malformed)
        };
        files.push(SnapshotFile {
            path,
            rows,
            malformed,
        });
    }
    Ok(Some(files))
}

/// All `.csv` files in `dir` and its immediate subdirectories, sorted.
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut files = Vec::new();
    for path in list_dir(dir)? {
        if path.is_dir() {
            files.extend(list_dir(&path)?.into_iter().filter(|p| is_csv(p)));
        } else if is_csv(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let io_err = |source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()).map_err(io_err))
        .collect()
}

fn is_csv(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv")
}

fn is_station_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with("_stationen") || stem.ends_with("_stations"))
}

/// Deserialize the rows of one file, returning them with a count of rows
/// that could not be parsed. Read failures are fatal.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize), ImportError> {
    let csv_err = |source| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut rows = Vec::new();
    let mut malformed = 0;
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(error) if error.is_io_error() => return Err(csv_err(error)),
            Err(error) => {
                warn!(file = %path.display(), %error, "skipping row");
                malformed += 1;
            }
        }
    }
    Ok((rows, malformed))
}

/// Empty strings stand for missing values.
fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Booleans as written by the conversion job, plus the query literals.
fn import_bool(s: &str) -> Option<bool> {
    match s {
        "x" | "X" => Some(true),
        "" => Some(false),
        other => parse_bool(other),
    }
}

fn import_date(s: &str) -> Option<NaiveDate> {
    parse_iso_date(s).or_else(|| NaiveDate::parse_from_str(s, "%d.%m.%Y").ok())
}

fn check_region(region: &str, catalog: &Catalog) -> Result<(), String> {
    if catalog.region(region).is_none() {
        return Err(format!("unknown region '{region}'"));
    }
    Ok(())
}

fn calendar_from_row(row: CalendarRow, catalog: &Catalog) -> Result<CalendarRecord, String> {
    check_region(&row.region, catalog)?;
    if catalog.type_label(&row.waste_type).is_none() {
        return Err(format!("unknown type '{}'", row.waste_type));
    }
    let date =
        import_date(&row.col_date).ok_or_else(|| format!("invalid date '{}'", row.col_date))?;
    let zip = non_empty(row.zip)
        .map(|z| Zip::parse(&z).map_err(|e| format!("{e}: '{z}'")))
        .transpose()?;

    Ok(CalendarRecord {
        date,
        waste_type: row.waste_type,
        zip,
        area: non_empty(row.area),
        station: non_empty(row.station),
        region: row.region,
    })
}

fn station_from_row(row: StationRow, catalog: &Catalog) -> Result<StationRecord, String> {
    check_region(&row.region, catalog)?;
    let zip = Zip::parse(&row.zip).map_err(|e| format!("{e}: '{}'", row.zip))?;
    let flag = |name: &str, value: &str| {
        import_bool(value).ok_or_else(|| format!("invalid {name} flag '{value}'"))
    };

    Ok(StationRecord {
        zip,
        kind: StationKind {
            oil: flag("oil", &row.oil)?,
            metal: flag("metal", &row.metal)?,
            glass: flag("glass", &row.glass)?,
            textile: flag("textile", &row.textile)?,
        },
        name: row.name,
        region: row.region,
    })
}
