//! Screen view-models.
//!
//! Each screen is plain state plus async operations against the
//! [`CarRepository`](crate::repository::CarRepository). Rendering and input
//! handling live in [`crate::app`]; nothing here prints.

pub mod detail;
pub mod list;
pub mod scope;

use crate::car::CarForm;

pub use detail::{DetailScreen, Draft, FieldRow, Mode, Section};
pub use list::{AddCarDialog, ListSavedState, ListScreen};
pub use scope::ScreenScope;

/// Where to go after a screen operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Open the detail screen for a car.
    Detail {
        /// The car to show.
        car: CarForm,
        /// The car was just created and opens straight into editing.
        fresh: bool,
    },
    /// Close the current screen.
    Back,
}
