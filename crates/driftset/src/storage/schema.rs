//! `SQLite` schema definitions for driftset.
//!
//! One row per car. Column names are the field catalogue's
//! [`Field::column`](crate::car::Field::column) values.

/// SQL statement to create the cars table.
pub const CREATE_CARS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    front_camber_degree_left REAL NOT NULL DEFAULT 0,
    front_camber_degree_right REAL NOT NULL DEFAULT 0,
    front_camber_length_left REAL NOT NULL DEFAULT 0,
    front_camber_length_right REAL NOT NULL DEFAULT 0,
    front_tow_degree_left REAL NOT NULL DEFAULT 0,
    front_tow_degree_right REAL NOT NULL DEFAULT 0,
    front_tow_length_left REAL NOT NULL DEFAULT 0,
    front_tow_length_right REAL NOT NULL DEFAULT 0,
    front_shock_name TEXT NOT NULL DEFAULT '',
    front_shock_length REAL NOT NULL DEFAULT 0,
    front_shock_preload REAL NOT NULL DEFAULT 0,
    front_rim_offset REAL NOT NULL DEFAULT 0,
    rear_camber_degree_left REAL NOT NULL DEFAULT 0,
    rear_camber_degree_right REAL NOT NULL DEFAULT 0,
    rear_camber_length_left REAL NOT NULL DEFAULT 0,
    rear_camber_length_right REAL NOT NULL DEFAULT 0,
    rear_tow_degree_left REAL NOT NULL DEFAULT 0,
    rear_tow_degree_right REAL NOT NULL DEFAULT 0,
    rear_tow_length_left REAL NOT NULL DEFAULT 0,
    rear_tow_length_right REAL NOT NULL DEFAULT 0,
    rear_shock_name TEXT NOT NULL DEFAULT '',
    rear_shock_length REAL NOT NULL DEFAULT 0,
    rear_shock_preload REAL NOT NULL DEFAULT 0,
    rear_rim_offset REAL NOT NULL DEFAULT 0
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_CARS_TABLE, CREATE_METADATA_TABLE];
