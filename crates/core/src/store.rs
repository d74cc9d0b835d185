//! SQLite-backed record store.
//!
//! [`DiagnosticTestStore`] is the single point of access to the `diagnostic_tests` table.
//! It is constructed once by the process entry point, shared with request handlers through
//! an `Arc`, and closed when the server shuts down. Each operation is one short round trip
//! made while holding the connection mutex; there are no multi-statement transactions
//! because there is only one entity and no relationships.

use crate::config::{CoreConfig, DatabaseLocation};
use crate::constants::TESTS_TABLE;
use crate::record::{DiagnosticTest, TestFields};
use crate::{RecordError, RecordResult};
use chrono::NaiveDate;
use dtr_uuid::{format_timestamp, next_timestamp, parse_timestamp, RecordId};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;
use std::time::Duration;

const SELECT_COLUMNS: &str =
    "id, patient_name, test_type, result, test_date, notes, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordered schema migrations. Each runs once, in order, when its version is newer than the
/// recorded `schema_version`.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../migrations/001_initial.sql"))];

/// Store client for diagnostic test records.
pub struct DiagnosticTestStore {
    conn: Mutex<Option<Connection>>,
}

impl std::fmt::Debug for DiagnosticTestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticTestStore").finish_non_exhaustive()
    }
}

impl DiagnosticTestStore {
    /// Open the database named by `cfg` and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the database cannot be opened and
    /// [`RecordError::Migration`] if a migration fails.
    pub fn open(cfg: &CoreConfig) -> RecordResult<Self> {
        let conn = match cfg.database() {
            DatabaseLocation::File(path) => {
                tracing::info!("opening database at {}", path.display());
                Connection::open(path)?
            }
            DatabaseLocation::Memory => {
                tracing::info!("opening in-memory database");
                Connection::open_in_memory()?
            }
        };
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (for tests and throwaway runs).
    pub fn open_in_memory() -> RecordResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> RecordResult<Self> {
        configure_connection(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> RecordResult<T>) -> RecordResult<T> {
        let guard = self.conn.lock().map_err(|_| RecordError::LockPoisoned)?;
        let conn = guard.as_ref().ok_or(RecordError::Closed)?;
        f(conn)
    }

    /// Fetch one record. Ids that are not canonical cannot exist and yield `None` directly.
    pub fn find_one(&self, id: &str) -> RecordResult<Option<DiagnosticTest>> {
        let Ok(id) = RecordId::parse(id) else {
            return Ok(None);
        };
        self.with_conn(|conn| select_by_id(conn, &id))
    }

    /// All records, newest first. Records created in the same microsecond keep insertion
    /// order (newest first).
    pub fn find_all(&self) -> RecordResult<Vec<DiagnosticTest>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM {TESTS_TABLE} ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(DiagnosticTestRow::into_record).collect()
        })
    }

    /// Insert a new record with a generated id and both timestamps set to now.
    pub fn create(&self, fields: TestFields) -> RecordResult<DiagnosticTest> {
        let now = next_timestamp(None);
        let record = DiagnosticTest {
            id: RecordId::new(),
            patient_name: fields.patient_name.into_inner(),
            test_type: fields.test_type.into_inner(),
            result: fields.result,
            test_date: fields.test_date,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        };

        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {TESTS_TABLE} ({SELECT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                params![
                    record.id.to_string(),
                    record.patient_name,
                    record.test_type,
                    record.result,
                    record.test_date.format(DATE_FORMAT).to_string(),
                    record.notes,
                    format_timestamp(&record.created_at),
                    format_timestamp(&record.updated_at),
                ],
            )?;
            Ok(())
        })?;

        Ok(record)
    }

    /// Replace the editable fields of an existing record.
    ///
    /// `id` and `createdAt` are preserved; `updatedAt` moves strictly forward.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no record has this id.
    pub fn update(&self, id: &str, fields: TestFields) -> RecordResult<DiagnosticTest> {
        let record_id = RecordId::parse(id).map_err(|_| RecordError::not_found(id))?;

        self.with_conn(|conn| {
            let existing =
                select_by_id(conn, &record_id)?.ok_or_else(|| RecordError::not_found(id))?;

            let updated = DiagnosticTest {
                id: existing.id,
                patient_name: fields.patient_name.into_inner(),
                test_type: fields.test_type.into_inner(),
                result: fields.result,
                test_date: fields.test_date,
                notes: fields.notes,
                created_at: existing.created_at,
                updated_at: next_timestamp(Some(existing.updated_at)),
            };

            let changed = conn.execute(
                &format!(
                    "UPDATE {TESTS_TABLE}
                     SET patient_name = ?2, test_type = ?3, result = ?4, test_date = ?5,
                         notes = ?6, updated_at = ?7
                     WHERE id = ?1"
                ),
                params![
                    updated.id.to_string(),
                    updated.patient_name,
                    updated.test_type,
                    updated.result,
                    updated.test_date.format(DATE_FORMAT).to_string(),
                    updated.notes,
                    format_timestamp(&updated.updated_at),
                ],
            )?;
            if changed == 0 {
                return Err(RecordError::not_found(id));
            }

            Ok(updated)
        })
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no record has this id, including when it was
    /// already deleted.
    pub fn delete(&self, id: &str) -> RecordResult<()> {
        let record_id = RecordId::parse(id).map_err(|_| RecordError::not_found(id))?;

        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                &format!("DELETE FROM {TESTS_TABLE} WHERE id = ?1"),
                params![record_id.to_string()],
            )?)
        })?;

        if changed == 0 {
            return Err(RecordError::not_found(id));
        }
        Ok(())
    }

    /// Number of stored records.
    pub fn count(&self) -> RecordResult<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {TESTS_TABLE}"), [], |row| {
                row.get(0)
            })?)
        })
    }

    /// Highest applied migration version.
    pub fn schema_version(&self) -> RecordResult<i64> {
        self.with_conn(current_version)
    }

    /// Release the connection. Later calls fail with [`RecordError::Closed`].
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) -> RecordResult<()> {
        let mut guard = self.conn.lock().map_err(|_| RecordError::LockPoisoned)?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| RecordError::Store(e))?;
            tracing::info!("database connection closed");
        }
        Ok(())
    }
}

fn configure_connection(conn: &Connection) -> RecordResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA journal_mode=DELETE;")?;
    Ok(())
}

/// Run all pending migrations.
pub(crate) fn run_migrations(conn: &Connection) -> RecordResult<()> {
    apply_migrations(conn, MIGRATIONS)
}

// Each migration runs in its own transaction so a failure leaves the schema at the last
// fully applied version.
fn apply_migrations(conn: &Connection, migrations: &[(i64, &str)]) -> RecordResult<()> {
    let current = current_version(conn)?;

    for (version, sql) in migrations {
        if *version > current {
            tracing::info!("running migration v{version}");
            let migration_failed = |e: rusqlite::Error| RecordError::Migration {
                version: *version,
                reason: e.to_string(),
            };
            let tx = conn.unchecked_transaction().map_err(migration_failed)?;
            tx.execute_batch(sql).map_err(migration_failed)?;
            tx.commit().map_err(migration_failed)?;
        }
    }

    Ok(())
}

/// Current schema version, 0 when no schema exists yet.
fn current_version(conn: &Connection) -> RecordResult<i64> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }

    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?)
}

fn select_by_id(conn: &Connection, id: &RecordId) -> RecordResult<Option<DiagnosticTest>> {
    let row = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM {TESTS_TABLE} WHERE id = ?1"),
            params![id.to_string()],
            read_row,
        )
        .optional()?;

    row.map(DiagnosticTestRow::into_record).transpose()
}

// Raw column values, converted to domain types outside the rusqlite closure so that bad
// data surfaces as `CorruptRow` instead of a generic driver error.
struct DiagnosticTestRow {
    id: String,
    patient_name: String,
    test_type: String,
    result: String,
    test_date: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiagnosticTestRow> {
    Ok(DiagnosticTestRow {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        test_type: row.get(2)?,
        result: row.get(3)?,
        test_date: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl DiagnosticTestRow {
    fn into_record(self) -> RecordResult<DiagnosticTest> {
        let id = RecordId::parse(&self.id).map_err(|_| RecordError::CorruptRow {
            column: "id",
            value: self.id.clone(),
        })?;
        let test_date =
            NaiveDate::parse_from_str(&self.test_date, DATE_FORMAT).map_err(|_| {
                RecordError::CorruptRow {
                    column: "test_date",
                    value: self.test_date.clone(),
                }
            })?;
        let created_at = parse_timestamp(&self.created_at).map_err(|_| RecordError::CorruptRow {
            column: "created_at",
            value: self.created_at.clone(),
        })?;
        let updated_at = parse_timestamp(&self.updated_at).map_err(|_| RecordError::CorruptRow {
            column: "updated_at",
            value: self.updated_at.clone(),
        })?;

        Ok(DiagnosticTest {
            id,
            patient_name: self.patient_name,
            test_type: self.test_type,
            result: self.result,
            test_date,
            notes: self.notes,
            created_at,
            updated_at,
        })
    }
}
