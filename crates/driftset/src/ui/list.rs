//! The car list screen and its "Add Car" dialog.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::car::CarForm;
use crate::error::Result;
use crate::repository::CarRepository;

use super::Navigation;

/// The part of the list screen that survives being torn down and rebuilt.
///
/// The add dialog comes back open but with an empty name, and the selected
/// car is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSavedState {
    /// Text in the search box.
    pub search_query: String,
    /// Whether the add dialog was showing.
    pub add_dialog_visible: bool,
}

/// The "Add Car" name-entry dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCarDialog {
    /// Name typed so far.
    pub name: String,
}

/// Lists every car, filtered by the search box.
#[derive(Debug)]
pub struct ListScreen {
    repository: CarRepository,
    cars: watch::Receiver<Vec<CarForm>>,
    search_query: String,
    add_dialog: Option<AddCarDialog>,
}

impl ListScreen {
    /// Open the list with an empty search and no dialog.
    #[must_use]
    pub fn new(repository: CarRepository) -> Self {
        Self::restore(repository, ListSavedState::default())
    }

    /// Rebuild the list from previously saved state.
    #[must_use]
    pub fn restore(repository: CarRepository, saved: ListSavedState) -> Self {
        let cars = repository.observe_all();
        Self {
            repository,
            cars,
            search_query: saved.search_query,
            add_dialog: saved.add_dialog_visible.then(AddCarDialog::default),
        }
    }

    /// State to hand back to [`restore`](Self::restore).
    #[must_use]
    pub fn saved_state(&self) -> ListSavedState {
        ListSavedState {
            search_query: self.search_query.clone(),
            add_dialog_visible: self.add_dialog.is_some(),
        }
    }

    /// Current search text.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Replace the search text.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Cars whose name contains the search text, ignoring case, in store
    /// order. An empty search matches every car.
    #[must_use]
    pub fn visible_cars(&self) -> Vec<CarForm> {
        let needle = self.search_query.to_lowercase();
        self.cars
            .borrow()
            .iter()
            .filter(|car| car.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Open the detail screen for the `index`th visible car.
    #[must_use]
    pub fn select(&self, index: usize) -> Option<Navigation> {
        let car = self.visible_cars().into_iter().nth(index)?;
        debug!("Selected car '{}' (id {})", car.name, car.id);
        Some(Navigation::Detail { car, fresh: false })
    }

    /// The add dialog, if showing.
    #[must_use]
    pub fn add_dialog(&self) -> Option<&AddCarDialog> {
        self.add_dialog.as_ref()
    }

    /// Show the add dialog with an empty name.
    pub fn open_add_dialog(&mut self) {
        self.add_dialog = Some(AddCarDialog::default());
    }

    /// Replace the name typed into the add dialog. Ignored when it is closed.
    pub fn set_new_car_name(&mut self, name: impl Into<String>) {
        if let Some(dialog) = self.add_dialog.as_mut() {
            dialog.name = name.into();
        }
    }

    /// Close the add dialog without adding anything.
    pub fn dismiss_add_dialog(&mut self) {
        self.add_dialog = None;
    }

    /// Confirm the add dialog.
    ///
    /// A blank name does nothing and leaves the dialog open. Otherwise the car
    /// is stored with every field empty, the dialog closes, and the returned
    /// navigation opens the new car for editing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn confirm_add(&mut self) -> Result<Option<Navigation>> {
        let Some(dialog) = self.add_dialog.as_ref() else {
            return Ok(None);
        };
        if dialog.name.trim().is_empty() {
            debug!("Ignoring add with blank name");
            return Ok(None);
        }

        let car = self
            .repository
            .insert(&CarForm::new_named(dialog.name.clone()))
            .await?;
        self.add_dialog = None;
        Ok(Some(Navigation::Detail { car, fresh: true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn create_test_repository() -> CarRepository {
        CarRepository::new(Storage::open_in_memory().unwrap()).unwrap()
    }

    async fn seeded_screen(names: &[&str]) -> ListScreen {
        let repo = create_test_repository();
        for name in names {
            repo.insert(&CarForm::new_named(*name)).await.unwrap();
        }
        ListScreen::new(repo)
    }

    fn names(cars: &[CarForm]) -> Vec<&str> {
        cars.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_query_shows_all() {
        let screen = seeded_screen(&["RX7", "S13", "AE86"]).await;
        assert_eq!(names(&screen.visible_cars()), vec!["RX7", "S13", "AE86"]);
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_and_ordered() {
        let mut screen = seeded_screen(&["RX7", "S13", "Mazda rx8", "Rx-3", "AE86"]).await;

        screen.set_search_query("rx");
        assert_eq!(
            names(&screen.visible_cars()),
            vec!["RX7", "Mazda rx8", "Rx-3"]
        );

        screen.set_search_query("RX");
        assert_eq!(screen.visible_cars().len(), 3);
    }

    #[tokio::test]
    async fn test_filter_no_match() {
        let mut screen = seeded_screen(&["RX7"]).await;
        screen.set_search_query("supra");
        assert!(screen.visible_cars().is_empty());
        assert!(screen.select(0).is_none());
    }

    #[tokio::test]
    async fn test_list_follows_repository_writes() {
        let repo = create_test_repository();
        let screen = ListScreen::new(repo.clone());
        assert!(screen.visible_cars().is_empty());

        repo.insert(&CarForm::new_named("Late arrival")).await.unwrap();
        assert_eq!(names(&screen.visible_cars()), vec!["Late arrival"]);
    }

    #[tokio::test]
    async fn test_select_uses_filtered_index() {
        let mut screen = seeded_screen(&["RX7", "S13", "RX8"]).await;
        screen.set_search_query("rx");

        let Some(Navigation::Detail { car, fresh }) = screen.select(1) else {
            panic!("expected detail navigation");
        };
        assert_eq!(car.name, "RX8");
        assert!(!fresh);
    }

    #[tokio::test]
    async fn test_add_creates_car_and_opens_it_fresh() {
        let mut screen = seeded_screen(&[]).await;
        screen.open_add_dialog();
        screen.set_new_car_name("RX7");

        let nav = screen.confirm_add().await.unwrap();
        let Some(Navigation::Detail { car, fresh }) = nav else {
            panic!("expected detail navigation");
        };
        assert!(fresh);
        assert!(!car.is_unsaved());
        assert_eq!(car.name, "RX7");
        assert!(screen.add_dialog().is_none());
        assert_eq!(names(&screen.visible_cars()), vec!["RX7"]);
    }

    #[tokio::test]
    async fn test_add_keeps_name_as_typed() {
        let mut screen = seeded_screen(&[]).await;
        screen.open_add_dialog();
        screen.set_new_car_name("  Chaser JZX100 ");

        screen.confirm_add().await.unwrap();
        assert_eq!(screen.visible_cars()[0].name, "  Chaser JZX100 ");
    }

    #[tokio::test]
    async fn test_add_blank_name_is_noop_and_dialog_stays_open() {
        let mut screen = seeded_screen(&[]).await;
        screen.open_add_dialog();

        for blank in ["", "   ", "\t"] {
            screen.set_new_car_name(blank);
            assert!(screen.confirm_add().await.unwrap().is_none());
            assert!(screen.add_dialog().is_some());
        }
        assert!(screen.visible_cars().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_without_dialog_is_noop() {
        let mut screen = seeded_screen(&[]).await;
        screen.set_new_car_name("ignored");
        assert!(screen.confirm_add().await.unwrap().is_none());
        assert!(screen.visible_cars().is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_add_dialog() {
        let mut screen = seeded_screen(&[]).await;
        screen.open_add_dialog();
        screen.set_new_car_name("Never saved");
        screen.dismiss_add_dialog();

        assert!(screen.add_dialog().is_none());
        assert!(screen.visible_cars().is_empty());
    }

    #[tokio::test]
    async fn test_saved_state_round_trip() {
        let repo = create_test_repository();
        let mut screen = ListScreen::new(repo.clone());
        screen.set_search_query("s1");
        screen.open_add_dialog();
        screen.set_new_car_name("half typed");

        let saved = screen.saved_state();
        assert_eq!(
            saved,
            ListSavedState {
                search_query: "s1".to_string(),
                add_dialog_visible: true,
            }
        );

        let json = serde_json::to_string(&saved).unwrap();
        let restored = ListScreen::restore(repo, serde_json::from_str(&json).unwrap());
        assert_eq!(restored.search_query(), "s1");
        assert_eq!(restored.add_dialog(), Some(&AddCarDialog::default()));
    }
}
