//! Car repository: the boundary between screens and the store.
//!
//! Screens speak [`CarForm`]; the store speaks [`CarRecord`](crate::car::CarRecord).
//! The repository converts at the boundary and republishes the full car list
//! on a `watch` channel after every successful write, so observers always see
//! the store's latest state without polling.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::car::CarForm;
use crate::error::Result;
use crate::storage::Storage;

/// Shared handle to the car store. Cloning is cheap; clones share the store
/// and the published list.
#[derive(Debug, Clone)]
pub struct CarRepository {
    storage: Arc<Mutex<Storage>>,
    cars: Arc<watch::Sender<Vec<CarForm>>>,
}

impl CarRepository {
    /// Wrap a store and publish its current contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial read fails.
    pub fn new(storage: Storage) -> Result<Self> {
        let initial = Self::read_forms(&storage)?;
        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            storage: Arc::new(Mutex::new(storage)),
            cars: Arc::new(tx),
        })
    }

    /// Subscribe to the car list. The receiver starts with the current list
    /// and is notified after every write.
    #[must_use]
    pub fn observe_all(&self) -> watch::Receiver<Vec<CarForm>> {
        self.cars.subscribe()
    }

    /// The most recently published car list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CarForm> {
        self.cars.borrow().clone()
    }

    /// Look up a car in the published list.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<CarForm> {
        self.cars.borrow().iter().find(|car| car.id == id).cloned()
    }

    /// Store a new car.
    ///
    /// Returns the form unchanged except for its newly assigned id, so blank
    /// fields stay blank on the edit screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn insert(&self, car: &CarForm) -> Result<CarForm> {
        let storage = self.storage.lock().await;
        let id = storage.insert(&car.to_record())?;
        self.publish(&storage)?;
        Ok(CarForm {
            id,
            ..car.clone()
        })
    }

    /// Replace the stored row matching `car.id` with the form's values.
    ///
    /// Returns `false` if no such row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn update(&self, car: &CarForm) -> Result<bool> {
        let storage = self.storage.lock().await;
        let updated = storage.update(&car.to_record())?;
        if updated {
            self.publish(&storage)?;
        }
        Ok(updated)
    }

    /// Remove the stored row matching `car.id`.
    ///
    /// Returns `false` if no such row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn delete(&self, car: &CarForm) -> Result<bool> {
        let storage = self.storage.lock().await;
        let deleted = storage.delete(car.id)?;
        if deleted {
            self.publish(&storage)?;
        }
        Ok(deleted)
    }

    /// Run a closure against the store while holding the lock.
    #[cfg(test)]
    pub(crate) async fn with_storage<T>(&self, f: impl FnOnce(&Storage) -> T) -> T {
        f(&*self.storage.lock().await)
    }

    fn publish(&self, storage: &Storage) -> Result<()> {
        let cars = Self::read_forms(storage)?;
        debug!("Publishing {} cars", cars.len());
        self.cars.send_replace(cars);
        Ok(())
    }

    fn read_forms(storage: &Storage) -> Result<Vec<CarForm>> {
        Ok(storage.get_all()?.iter().map(CarForm::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::Field;

    fn create_test_repository() -> CarRepository {
        CarRepository::new(Storage::open_in_memory().unwrap()).unwrap()
    }

    fn field(key: &str) -> Field {
        key.parse().unwrap()
    }

    #[tokio::test]
    async fn test_new_repository_is_empty() {
        let repo = create_test_repository();
        assert!(repo.snapshot().is_empty());
        assert!(repo.observe_all().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_new_repository_publishes_existing_rows() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .insert(&CarForm::new_named("Existing").to_record())
            .unwrap();

        let repo = CarRepository::new(storage).unwrap();
        assert_eq!(repo.snapshot().len(), 1);
        assert_eq!(repo.snapshot()[0].name, "Existing");
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_keeps_blank_text() {
        let repo = create_test_repository();

        let car = repo.insert(&CarForm::new_named("RX7")).await.unwrap();
        assert!(!car.is_unsaved());
        assert_eq!(car.name, "RX7");
        assert_eq!(car.text(field("front.camber_degree_left")), "");
    }

    #[tokio::test]
    async fn test_created_car_reads_back_with_defaults() {
        let repo = create_test_repository();
        repo.insert(&CarForm::new_named("RX7")).await.unwrap();

        let cars = repo.snapshot();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].name, "RX7");
        for f in Field::all() {
            let expected = if f.is_numeric() { "0.0" } else { "" };
            assert_eq!(cars[0].text(f), expected, "{f}");
        }
    }

    #[tokio::test]
    async fn test_observers_are_notified_on_write() {
        let repo = create_test_repository();
        let mut rx = repo.observe_all();
        assert!(!rx.has_changed().unwrap());

        repo.insert(&CarForm::new_named("S13")).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let cars = rx.borrow_and_update().clone();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].name, "S13");
    }

    #[tokio::test]
    async fn test_update_persists_and_republishes() {
        let repo = create_test_repository();
        let mut car = repo.insert(&CarForm::new_named("AE86")).await.unwrap();

        car.set_text(field("rear.rim_offset"), "12.5");
        car.set_text(field("front.tow_degree_left"), "garbage");
        assert!(repo.update(&car).await.unwrap());

        let stored = repo.find(car.id).unwrap();
        assert_eq!(stored.text(field("rear.rim_offset")), "12.5");
        assert_eq!(stored.text(field("front.tow_degree_left")), "0.0");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let repo = create_test_repository();
        let mut ghost = CarForm::new_named("Ghost");
        ghost.id = 77;

        assert!(!repo.update(&ghost).await.unwrap());
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let repo = create_test_repository();
        let keep = repo.insert(&CarForm::new_named("Keep")).await.unwrap();
        let gone = repo.insert(&CarForm::new_named("Gone")).await.unwrap();

        assert!(repo.delete(&gone).await.unwrap());
        assert!(repo.find(gone.id).is_none());
        assert!(repo.find(keep.id).is_some());
        assert!(!repo.delete(&gone).await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = create_test_repository();
        let other = repo.clone();

        other.insert(&CarForm::new_named("Shared")).await.unwrap();
        assert_eq!(repo.snapshot().len(), 1);
    }
}
