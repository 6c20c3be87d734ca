//! Schema versioning for the car database.
//!
//! The version number lives in `metadata` under `schema_version`. Each entry
//! in [`MIGRATIONS`] upgrades the schema to its version; opening a database
//! applies every entry newer than the stored version, in order, and refuses a
//! database written by a newer driftset.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

type Migration = fn(&Connection) -> Result<()>;

/// Every schema version with the step that produces it, oldest first.
const MIGRATIONS: &[(i32, Migration)] = &[(1, base_schema)];

/// The schema version this build reads and writes.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Bring a database up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if a step fails, the stored version is unreadable, or the
/// database is newer than this build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let stored = stored_version(conn)?;
    if stored > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {stored} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for &(version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > stored) {
        migrate(conn)?;
        record_version(conn, version)?;
        info!("Car database upgraded to schema version {}", version);
    }
    Ok(())
}

/// Stored schema version; 0 for a database that has never been initialized.
fn stored_version(conn: &Connection) -> Result<i32> {
    conn.execute_batch(super::schema::CREATE_METADATA_TABLE)?;

    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(text) => text.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("unreadable schema version '{text}'"),
        }),
    }
}

fn record_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Version 1: the `cars` and `metadata` tables.
fn base_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute_batch(statement)?;
    }
    Ok(())
}
