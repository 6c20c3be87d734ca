//! Storage layer for driftset.
//!
//! A single `SQLite` table holds one row per car. Writes are whole-row:
//! [`Storage::update`] replaces every column of the matching row, so a commit
//! from the edit screen is atomic without an explicit transaction.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::car::{CarRecord, Field};
use crate::config::JournalMode;
use crate::error::{Error, Result};

/// Storage engine for car records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// SQL generated from the field catalogue.
    sql: Statements,
}

/// Row statements, built once from the field catalogue so column order
/// always matches [`Field::all`].
#[derive(Debug)]
struct Statements {
    select_all: String,
    select_one: String,
    insert: String,
    update: String,
}

impl Statements {
    fn new() -> Self {
        let columns: Vec<String> = std::iter::once("name".to_string())
            .chain(Field::all().map(|f| f.column()))
            .collect();
        let column_list = columns.join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            select_all: format!("SELECT id, {column_list} FROM cars ORDER BY id ASC"),
            select_one: format!("SELECT id, {column_list} FROM cars WHERE id = ?1"),
            insert: format!("INSERT INTO cars ({column_list}) VALUES ({placeholders})"),
            update: format!(
                "UPDATE cars SET {assignments} WHERE id = ?{}",
                columns.len() + 1
            ),
        }
    }
}

impl Storage {
    /// Open or create a database at the given path in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, JournalMode::default())
    }

    /// Open or create a database with an explicit journal mode.
    ///
    /// Creates parent directories and the schema as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open_with(path: impl AsRef<Path>, journal_mode: JournalMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(&format!(
            "PRAGMA journal_mode={}; PRAGMA synchronous=NORMAL;",
            journal_mode.pragma()
        ))?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn,
            sql: Statements::new(),
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            sql: Statements::new(),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored car, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_all(&self) -> Result<Vec<CarRecord>> {
        let mut stmt = self.conn.prepare_cached(&self.sql.select_all)?;
        let cars = stmt
            .query_map([], Self::row_to_car)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(cars)
    }

    /// Get a car by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<CarRecord>> {
        let car = self
            .conn
            .query_row(&self.sql.select_one, [id], Self::row_to_car)
            .optional()?;
        Ok(car)
    }

    /// Insert a car and return its newly assigned ID.
    ///
    /// The record's own `id` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, car: &CarRecord) -> Result<i64> {
        self.conn
            .execute(&self.sql.insert, params_from_iter(Self::row_values(car)))?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted car '{}' with id {}", car.name, id);
        Ok(id)
    }

    /// Replace every column of the row whose ID matches `car.id`.
    ///
    /// Returns `false` (and changes nothing) if no such row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update(&self, car: &CarRecord) -> Result<bool> {
        let mut values = Self::row_values(car);
        values.push(Value::Integer(car.id));

        let affected = self
            .conn
            .execute(&self.sql.update, params_from_iter(values))?;
        if affected == 0 {
            warn!("Update skipped: no car with id {}", car.id);
            return Ok(false);
        }
        debug!("Updated car '{}' (id {})", car.name, car.id);
        Ok(true)
    }

    /// Delete a car by ID.
    ///
    /// Returns `true` if a car was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM cars WHERE id = ?1", [id])?;
        if affected > 0 {
            debug!("Deleted car with id {}", id);
        }
        Ok(affected > 0)
    }

    /// Count stored cars.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cars", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Run raw SQL against the connection.
    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Name followed by every field value, in catalogue order.
    fn row_values(car: &CarRecord) -> Vec<Value> {
        std::iter::once(Value::Text(car.name.clone()))
            .chain(Field::all().map(|field| {
                let axle = car.axle(field.axle);
                match axle.number(field.tunable) {
                    Some(number) => Value::Real(number),
                    None => Value::Text(axle.shock_name.clone()),
                }
            }))
            .collect()
    }

    fn row_to_car(row: &rusqlite::Row) -> rusqlite::Result<CarRecord> {
        let mut car = CarRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            ..CarRecord::default()
        };

        for (offset, field) in Field::all().enumerate() {
            let index = offset + 2;
            let axle = car.axle_mut(field.axle);
            match axle.number_mut(field.tunable) {
                Some(slot) => *slot = row.get(index)?,
                None => axle.shock_name = row.get(index)?,
            }
        }

        Ok(car)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::{AxleRecord, CarForm};

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn create_test_car(name: &str) -> CarRecord {
        CarForm::new_named(name).to_record()
    }

    fn tuned_car(name: &str) -> CarRecord {
        let mut car = create_test_car(name);
        car.front = AxleRecord {
            camber_degree_left: -3.5,
            camber_degree_right: -3.25,
            camber_length_left: 120.0,
            camber_length_right: 121.5,
            tow_degree_left: 0.5,
            tow_degree_right: 0.75,
            tow_length_left: 88.0,
            tow_length_right: 88.5,
            shock_name: "BC Racing BR".to_string(),
            shock_length: 330.0,
            shock_preload: 5.0,
            rim_offset: 22.0,
        };
        car.rear.shock_name = "Tein Flex Z".to_string();
        car.rear.rim_offset = 15.0;
        car
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_insert_assigns_ids() {
        let storage = create_test_storage();

        let id1 = storage.insert(&create_test_car("RX7")).unwrap();
        let id2 = storage.insert(&create_test_car("S13")).unwrap();

        assert!(id1 > 0);
        assert!(id2 > id1);
    }

    #[test]
    fn test_insert_ignores_incoming_id() {
        let storage = create_test_storage();
        let mut car = create_test_car("RX7");
        car.id = 999;

        let id = storage.insert(&car).unwrap();
        assert_ne!(id, 999);
        assert!(storage.get(999).unwrap().is_none());
    }

    #[test]
    fn test_insert_and_get_every_column() {
        let storage = create_test_storage();
        let mut car = tuned_car("Silvia");

        car.id = storage.insert(&car).unwrap();
        let retrieved = storage.get(car.id).unwrap().unwrap();

        assert_eq!(retrieved, car);
    }

    #[test]
    fn test_new_car_reads_back_with_defaults() {
        let storage = create_test_storage();
        storage.insert(&create_test_car("RX7")).unwrap();

        let cars = storage.get_all().unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].name, "RX7");
        assert_eq!(cars[0].front, AxleRecord::default());
        assert_eq!(cars[0].rear, AxleRecord::default());
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();
        assert!(storage.get(99999).unwrap().is_none());
    }

    #[test]
    fn test_get_all_in_insertion_order() {
        let storage = create_test_storage();
        for name in ["Chaser", "AE86", "Zed"] {
            storage.insert(&create_test_car(name)).unwrap();
        }

        let names: Vec<String> = storage
            .get_all()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Chaser", "AE86", "Zed"]);
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let storage = create_test_storage();
        storage.insert(&create_test_car("RX7")).unwrap();
        storage.insert(&create_test_car("RX7")).unwrap();
        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_update_replaces_whole_row() {
        let storage = create_test_storage();
        let mut car = tuned_car("Silvia");
        car.id = storage.insert(&car).unwrap();

        let mut replacement = create_test_car("Silvia S15");
        replacement.id = car.id;
        replacement.rear.tow_degree_left = 1.5;

        assert!(storage.update(&replacement).unwrap());
        let retrieved = storage.get(car.id).unwrap().unwrap();
        assert_eq!(retrieved, replacement);
        assert_eq!(retrieved.front.shock_name, "");
    }

    #[test]
    fn test_update_nonexistent_is_noop() {
        let storage = create_test_storage();
        storage.insert(&create_test_car("RX7")).unwrap();

        let mut ghost = create_test_car("Ghost");
        ghost.id = 42;
        assert!(!storage.update(&ghost).unwrap());
        assert_eq!(storage.count().unwrap(), 1);
        assert!(storage.get(42).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let storage = create_test_storage();
        let id = storage.insert(&create_test_car("To delete")).unwrap();

        assert!(storage.delete(id).unwrap());
        assert!(storage.get(id).unwrap().is_none());
        assert!(storage.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_nonexistent() {
        let storage = create_test_storage();
        assert!(!storage.delete(99999).unwrap());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let storage = create_test_storage();
        let id1 = storage.insert(&create_test_car("A")).unwrap();
        storage.delete(id1).unwrap();
        let id2 = storage.insert(&create_test_car("B")).unwrap();
        assert!(id2 > id1);
    }

    #[test]
    fn test_unicode_name() {
        let storage = create_test_storage();
        let id = storage.insert(&create_test_car("ハチロク 🚗")).unwrap();
        assert_eq!(storage.get(id).unwrap().unwrap().name, "ハチロク 🚗");
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_statements_bind_every_column() {
        let sql = Statements::new();
        // name + 24 fields, then the id in the WHERE clause
        assert!(sql.insert.contains("?25)"));
        assert!(!sql.insert.contains("?26"));
        assert!(sql.update.ends_with("WHERE id = ?26"));
        assert!(sql.select_all.starts_with("SELECT id, name, front_camber_degree_left"));
    }

    #[test]
    fn test_open_file_based() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("driftset_test_{}.db", std::process::id()));

        let storage = Storage::open(&db_path).unwrap();
        storage.insert(&create_test_car("Test")).unwrap();
        assert_eq!(storage.count().unwrap(), 1);
        assert_eq!(storage.path(), db_path);

        drop(storage);
        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);

        drop(reopened);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_with_delete_journal() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("driftset_journal_{}.db", std::process::id()));

        let storage = Storage::open_with(&db_path, JournalMode::Delete).unwrap();
        let mode: String = storage
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "delete");

        drop(storage);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let root = temp_dir.join(format!("driftset_test_{}", std::process::id()));
        let nested_path = root.join("nested/cars.db");
        let _ = std::fs::remove_dir_all(&root);

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(storage);
        let _ = std::fs::remove_dir_all(&root);
    }
}
