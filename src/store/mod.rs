//! SQLite-backed persistence for normalized vehicle records.
//!
//! One table, `vehicles`, keyed by vehicle id. Every upsert replaces the
//! whole row, so loading the same snapshot twice leaves the table unchanged.

mod error;

pub use error::{StoreError, StoreResult};

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::model::VehicleRecord;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS vehicles (
        id               TEXT PRIMARY KEY,
        label            TEXT NOT NULL,
        latitude         REAL NOT NULL,
        longitude        REAL NOT NULL,
        speed            REAL NOT NULL,
        direction_id     INTEGER NOT NULL,
        current_status   TEXT NOT NULL,
        occupancy_status TEXT NOT NULL,
        bearing          INTEGER NOT NULL,
        updated_at       TEXT NOT NULL,
        ingested_at      TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_updated_at ON vehicles(updated_at);
    CREATE INDEX IF NOT EXISTS idx_label ON vehicles(label);
";

const COLUMNS: &str = "id, label, latitude, longitude, speed, direction_id, \
                       current_status, occupancy_status, bearing, updated_at, ingested_at";

/// Durable store for [`VehicleRecord`]s.
pub struct VehicleStore {
    conn: Option<Connection>,
}

impl VehicleStore {
    /// Opens (or creates) the database at `path` and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        let store = Self { conn: Some(conn) };
        store.init()?;
        Ok(store)
    }

    /// Opens a private in-memory database, mostly useful in tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self {
            conn: Some(Connection::open_in_memory()?),
        };
        store.init()?;
        Ok(store)
    }

    /// Creates the `vehicles` table and its indexes if they are missing.
    pub fn init(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Inserts or fully replaces every record in one transaction.
    ///
    /// Either the whole batch is committed or nothing is: any failure drops
    /// the transaction, which rolls it back.
    pub fn upsert(&mut self, records: &[VehicleRecord]) -> StoreResult<()> {
        let conn = self.conn.as_mut().ok_or(StoreError::Closed)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO vehicles \
                 (id, label, latitude, longitude, speed, direction_id, current_status, \
                  occupancy_status, bearing, updated_at, ingested_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
                 ON CONFLICT(id) DO UPDATE SET \
                     label            = excluded.label, \
                     latitude         = excluded.latitude, \
                     longitude        = excluded.longitude, \
                     speed            = excluded.speed, \
                     direction_id     = excluded.direction_id, \
                     current_status   = excluded.current_status, \
                     occupancy_status = excluded.occupancy_status, \
                     bearing          = excluded.bearing, \
                     updated_at       = excluded.updated_at, \
                     ingested_at      = excluded.ingested_at",
            )?;
            for r in records {
                stmt.execute(params![
                    r.id,
                    r.label,
                    r.latitude,
                    r.longitude,
                    r.speed,
                    r.direction_id,
                    r.current_status,
                    r.occupancy_status,
                    r.bearing,
                    format_timestamp(&r.updated_at),
                    format_timestamp(&r.ingested_at),
                ])?;
            }
        }
        tx.commit()?;

        debug!(records = records.len(), "Upsert committed");
        Ok(())
    }

    /// Total number of stored vehicles.
    pub fn count_all(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The record stored under `id`, or [`StoreError::NotFound`].
    pub fn get_by_id(&self, id: &str) -> StoreResult<VehicleRecord> {
        self.conn()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM vehicles WHERE id = ?1"),
                params![id],
                record_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// The `n` fastest vehicles, fastest first. Order among equal speeds is
    /// unspecified.
    pub fn top_n_by_speed(&self, n: usize) -> StoreResult<Vec<VehicleRecord>> {
        self.query_records(
            &format!("SELECT {COLUMNS} FROM vehicles ORDER BY speed DESC LIMIT ?1"),
            params![n as i64],
        )
    }

    /// Vehicles whose bearing lies in `[min, max]`.
    pub fn by_bearing_range(&self, min: i64, max: i64) -> StoreResult<Vec<VehicleRecord>> {
        self.query_records(
            &format!(
                "SELECT {COLUMNS} FROM vehicles WHERE bearing BETWEEN ?1 AND ?2 ORDER BY bearing, id"
            ),
            params![min, max],
        )
    }

    /// Every stored vehicle, ordered by id.
    pub fn all(&self) -> StoreResult<Vec<VehicleRecord>> {
        self.query_records(&format!("SELECT {COLUMNS} FROM vehicles ORDER BY id"), [])
    }

    /// Closes the underlying connection. Every later call returns
    /// [`StoreError::Closed`].
    pub fn close(&mut self) -> StoreResult<()> {
        let conn = self.conn.take().ok_or(StoreError::Closed)?;
        if let Err((conn, e)) = conn.close() {
            self.conn = Some(conn);
            return Err(e.into());
        }
        Ok(())
    }

    fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Vec<VehicleRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map(params, record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

/// Fixed-width RFC 3339 in UTC, so text order matches time order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<VehicleRecord> {
    Ok(VehicleRecord {
        id: row.get(0)?,
        label: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        speed: row.get(4)?,
        direction_id: row.get(5)?,
        current_status: row.get(6)?,
        occupancy_status: row.get(7)?,
        bearing: row.get(8)?,
        updated_at: parse_timestamp(row, 9)?,
        ingested_at: parse_timestamp(row, 10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, speed: f64) -> VehicleRecord {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap();
        VehicleRecord {
            id: id.to_string(),
            label: format!("L{id}"),
            latitude: 42.3601,
            longitude: -71.0589,
            speed,
            direction_id: 0,
            current_status: "IN_TRANSIT_TO".to_string(),
            occupancy_status: "MANY_SEATS_AVAILABLE".to_string(),
            bearing: 180,
            updated_at: ts,
            ingested_at: ts,
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        store.upsert(&[record("y1", 10.0)]).unwrap();

        store.init().unwrap();
        store.init().unwrap();

        assert_eq!(store.count_all().unwrap(), 1);
    }

    #[test]
    fn test_indexes_created() {
        let store = VehicleStore::open_in_memory().unwrap();
        let conn = store.conn().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'vehicles' ORDER BY name")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(names.contains(&"idx_label".to_string()));
        assert!(names.contains(&"idx_updated_at".to_string()));
    }

    #[test]
    fn test_upsert_and_get_by_id() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        let r = record("y1", 25.5);
        store.upsert(std::slice::from_ref(&r)).unwrap();

        assert_eq!(store.get_by_id("y1").unwrap(), r);
    }

    #[test]
    fn test_get_by_id_not_found() {
        let store = VehicleStore::open_in_memory().unwrap();
        assert!(matches!(
            store.get_by_id("missing"),
            Err(StoreError::NotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        store.upsert(&[record("y1", 25.5)]).unwrap();

        let mut updated = record("y1", 30.0);
        updated.current_status = "STOPPED_AT".to_string();
        store.upsert(&[updated]).unwrap();

        assert_eq!(store.count_all().unwrap(), 1);
        let stored = store.get_by_id("y1").unwrap();
        assert_eq!(stored.speed, 30.0);
        assert_eq!(stored.current_status, "STOPPED_AT");
    }

    #[test]
    fn test_upsert_twice_is_idempotent() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        let batch = vec![record("y1", 1.0), record("R-5001", 2.0), record("G-10", 3.0)];

        store.upsert(&batch).unwrap();
        let once = store.all().unwrap();
        store.upsert(&batch).unwrap();

        assert_eq!(store.all().unwrap(), once);
        assert_eq!(store.count_all().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        store
            .upsert(&[record("y1", 5.0), record("y1", 9.0)])
            .unwrap();

        assert_eq!(store.count_all().unwrap(), 1);
        assert_eq!(store.get_by_id("y1").unwrap().speed, 9.0);
    }

    #[test]
    fn test_failed_upsert_rolls_back() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        // SQLite binds NaN as NULL, which violates the NOT NULL constraint.
        let result = store.upsert(&[record("y1", 5.0), record("y2", f64::NAN)]);

        assert!(matches!(result, Err(StoreError::Sqlite(_))));
        assert_eq!(store.count_all().unwrap(), 0);
    }

    #[test]
    fn test_top_n_by_speed() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        let batch: Vec<_> = (0..15)
            .map(|i| record(&format!("v{i:02}"), (i * 5) as f64))
            .collect();
        store.upsert(&batch).unwrap();

        let top = store.top_n_by_speed(10).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].speed, 70.0);
        assert!(top.windows(2).all(|w| w[0].speed >= w[1].speed));
    }

    #[test]
    fn test_by_bearing_range_inclusive() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        let batch: Vec<_> = [80, 90, 100, 101, 5]
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let mut r = record(&format!("v{i}"), 1.0);
                r.bearing = *b;
                r
            })
            .collect();
        store.upsert(&batch).unwrap();

        let hits = store.by_bearing_range(80, 100).unwrap();
        let bearings: Vec<_> = hits.iter().map(|r| r.bearing).collect();
        assert_eq!(bearings, [80, 90, 100]);
    }

    #[test]
    fn test_timestamps_round_trip_through_text() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        let mut r = record("y1", 1.0);
        r.ingested_at = Utc.timestamp_opt(1_705_332_600, 123_456_789).unwrap();
        store.upsert(std::slice::from_ref(&r)).unwrap();

        let raw: String = store
            .conn()
            .unwrap()
            .query_row("SELECT ingested_at FROM vehicles WHERE id = 'y1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "2024-01-15T15:30:00.123456789Z");
        assert_eq!(store.get_by_id("y1").unwrap().ingested_at, r.ingested_at);
    }

    #[test]
    fn test_normalized_record_reads_back_unchanged() {
        use crate::model::{Attributes, RawVehicle};

        let raw = RawVehicle {
            id: "y1808".to_string(),
            kind: "vehicle".to_string(),
            attributes: Attributes {
                updated_at: "2024-01-15T10:30:00.123456789Z".to_string(),
                label: "1808".to_string(),
                speed: Some(8.5),
                bearing: Some(180),
                ..Default::default()
            },
        };
        let records = crate::normalize::normalize(&[raw], Utc::now());

        let mut store = VehicleStore::open_in_memory().unwrap();
        store.upsert(&records).unwrap();

        assert_eq!(store.get_by_id("y1808").unwrap(), records[0]);
        assert_eq!(store.all().unwrap(), records);
    }

    #[test]
    fn test_closed_store_rejects_calls() {
        let mut store = VehicleStore::open_in_memory().unwrap();
        store.close().unwrap();

        assert!(matches!(store.count_all(), Err(StoreError::Closed)));
        assert!(matches!(store.upsert(&[record("y1", 1.0)]), Err(StoreError::Closed)));
        assert!(matches!(store.get_by_id("y1"), Err(StoreError::Closed)));
        assert!(matches!(store.close(), Err(StoreError::Closed)));
    }

    #[test]
    fn test_open_file_persists_between_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles.db");

        {
            let mut store = VehicleStore::open(&path).unwrap();
            store.upsert(&[record("y1", 12.0)]).unwrap();
            store.close().unwrap();
        }

        let store = VehicleStore::open(&path).unwrap();
        assert_eq!(store.get_by_id("y1").unwrap().speed, 12.0);
    }
}
