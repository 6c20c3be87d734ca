//! The car detail screen: view, edit, mirror, delete.
//!
//! The screen is a two-state machine:
//!
//! ```text
//!   Viewing --toggle--> Editing            (no write)
//!   Editing --toggle--> Viewing            (whole-row update of the draft)
//!   either  --back----> closed             (unsaved edits are dropped)
//! ```
//!
//! Edits accumulate in a [`Draft`] and reach the store only through the
//! Editing→Viewing toggle.

use tracing::{debug, warn};

use crate::car::{Axle, CarForm, Field};
use crate::error::Result;
use crate::repository::CarRepository;

use super::{Navigation, ScreenScope};

/// Whether the screen shows values or editable text boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Read-only.
    Viewing,
    /// Every field editable.
    Editing,
}

/// Pending changes to one car, applied to the store as a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    committed: CarForm,
    working: CarForm,
}

impl Draft {
    /// Start a draft from the car as last stored.
    #[must_use]
    pub fn new(car: CarForm) -> Self {
        Self {
            working: car.clone(),
            committed: car,
        }
    }

    /// The car with pending changes applied.
    #[must_use]
    pub fn form(&self) -> &CarForm {
        &self.working
    }

    /// Write `text` into `field`. With `mirror` on, a paired field's partner
    /// receives the same text. Returns every field written.
    pub fn set(&mut self, field: Field, text: &str, mirror: bool) -> Vec<Field> {
        let mut written = vec![field];
        if mirror {
            written.extend(field.mirror_partner());
        }
        for target in &written {
            self.working.set_text(*target, text);
        }
        written
    }

    /// Whether anything changed since the last commit.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.working != self.committed
    }

    /// Take the pending car for storing and treat it as committed.
    pub fn commit(&mut self) -> CarForm {
        self.committed = self.working.clone();
        self.working.clone()
    }

    /// Throw away pending changes.
    pub fn discard(&mut self) {
        self.working = self.committed.clone();
    }
}

/// One label/value line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    /// The field shown.
    pub field: Field,
    /// Label, e.g. `Camber Degree Left`.
    pub label: String,
    /// Current text.
    pub value: String,
}

/// The rows of one axle under its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// `Front Settings` or `Rear Settings`.
    pub heading: &'static str,
    /// Rows in display order.
    pub rows: Vec<FieldRow>,
}

/// Shows and edits one car.
#[derive(Debug)]
pub struct DetailScreen {
    repository: CarRepository,
    draft: Draft,
    mode: Mode,
    mirror: bool,
    delete_dialog: bool,
    scope: ScreenScope,
}

impl DetailScreen {
    /// Open a car. A `fresh` or never-stored car starts in
    /// [`Mode::Editing`]; anything else starts in [`Mode::Viewing`]. Mirror
    /// mode always starts off.
    #[must_use]
    pub fn open(repository: CarRepository, car: CarForm, fresh: bool) -> Self {
        let mode = if fresh || car.is_unsaved() {
            Mode::Editing
        } else {
            Mode::Viewing
        };
        debug!("Opening car '{}' (id {}) in {:?} mode", car.name, car.id, mode);

        Self {
            repository,
            draft: Draft::new(car),
            mode,
            mirror: false,
            delete_dialog: false,
            scope: ScreenScope::new(),
        }
    }

    /// The car as currently shown, pending edits included.
    #[must_use]
    pub fn car(&self) -> &CarForm {
        self.draft.form()
    }

    /// Screen title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.draft.form().name
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether fields are editable.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    /// Whether mirror mode is on.
    #[must_use]
    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Turn mirror mode on or off. Existing values are left alone.
    pub fn set_mirror(&mut self, on: bool) {
        self.mirror = on;
    }

    /// Whether there are edits not yet sent to the store.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.draft.is_dirty()
    }

    /// Current text of a field.
    #[must_use]
    pub fn field_text(&self, field: Field) -> &str {
        self.draft.form().text(field)
    }

    /// Type into a field. Returns the fields written, empty when not editing.
    pub fn set_field(&mut self, field: Field, text: &str) -> Vec<Field> {
        if !self.is_editing() {
            debug!("Ignoring edit of {} while viewing", field);
            return Vec::new();
        }
        self.draft.set(field, text, self.mirror)
    }

    /// All fields grouped by axle, in display order.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        Axle::ALL
            .into_iter()
            .map(|axle| Section {
                heading: axle.heading(),
                rows: Field::all()
                    .filter(|field| field.axle == axle)
                    .map(|field| FieldRow {
                        field,
                        label: field.label(),
                        value: self.field_text(field).to_string(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Flip between viewing and editing.
    ///
    /// Leaving editing sends the whole draft to the store in the background.
    /// Successive commits land in the order they were made; failures surface
    /// from [`settle`](Self::settle).
    pub fn toggle_edit(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Viewing => Mode::Editing,
            Mode::Editing => {
                let car = self.draft.commit();
                let repository = self.repository.clone();
                self.scope.spawn(async move {
                    if !repository.update(&car).await? {
                        warn!("Car '{}' (id {}) is no longer stored", car.name, car.id);
                    }
                    Ok(())
                });
                Mode::Viewing
            }
        };
        self.mode
    }

    /// Whether the delete confirmation is showing.
    #[must_use]
    pub fn is_delete_dialog_open(&self) -> bool {
        self.delete_dialog
    }

    /// Show the delete confirmation.
    pub fn request_delete(&mut self) {
        self.delete_dialog = true;
    }

    /// Hide the delete confirmation without deleting.
    pub fn cancel_delete(&mut self) {
        self.delete_dialog = false;
    }

    /// Delete the car and close the screen.
    ///
    /// Outstanding writes finish first so a late update cannot race the
    /// delete.
    ///
    /// # Errors
    ///
    /// Returns an error if a pending write or the delete fails.
    pub async fn confirm_delete(&mut self) -> Result<Navigation> {
        self.scope.settle().await?;
        self.repository.delete(self.draft.form()).await?;
        self.delete_dialog = false;
        Ok(Navigation::Back)
    }

    /// Close the screen. Edits not committed by leaving editing are dropped.
    pub fn back(&mut self) -> Navigation {
        if self.draft.is_dirty() {
            debug!("Discarding unsaved edits to '{}'", self.title());
            self.draft.discard();
        }
        Navigation::Back
    }

    /// Wait for background writes.
    ///
    /// # Errors
    ///
    /// Returns the first failed write.
    pub async fn settle(&mut self) -> Result<()> {
        self.scope.settle().await
    }
}
