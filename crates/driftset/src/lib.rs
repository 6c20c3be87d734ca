//! `driftset` - A notebook for drift car chassis setups
//!
//! This library stores one record per car (camber, toe, shock and rim
//! settings for each axle) and provides the list and detail screens that
//! browse and edit them, plus a line-driven shell that hosts the screens.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod car;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod repository;
pub mod storage;
pub mod ui;

pub use app::App;
pub use car::{CarForm, CarRecord, Field};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use repository::CarRepository;
pub use storage::Storage;
