use std::sync::Arc;

use foodster_core::{Coordinate, Restaurant, SortKey};
use foodster_db::{SaveStore, SqlitePool, ToggleOutcome};
use foodster_yelp::RestaurantService;
use tokio::sync::{mpsc, oneshot, watch};

use crate::actor::{Actor, Command};
use crate::error::StateError;
use crate::snapshot::{DetailOutcome, LoadOutcome, QuerySnapshot};

const COMMAND_BUFFER: usize = 32;

/// Handle to the query state actor.
///
/// Cloning the handle is cheap; every clone talks to the same actor. The
/// actor stops once the last handle is dropped.
#[derive(Debug, Clone)]
pub struct QueryStateManager {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<QuerySnapshot>>,
}

impl QueryStateManager {
    /// Spawns the actor on the current tokio runtime.
    ///
    /// The store's mirror is taken as-is for the first snapshot, so open or
    /// refresh it beforehand.
    #[must_use]
    pub fn spawn(service: Arc<dyn RestaurantService>, store: SaveStore) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let initial = QuerySnapshot {
            saved: store.saved().to_vec(),
            ..QuerySnapshot::default()
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(initial));

        tokio::spawn(Actor::new(service, store, command_rx, snapshot_tx).run());

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }

    /// The latest published state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<QuerySnapshot> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<QuerySnapshot>> {
        self.snapshots.clone()
    }

    /// Replaces the search inputs. Does not trigger a load.
    ///
    /// A `None` location leaves the location text empty so that `coordinate`
    /// is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn set_parameters(
        &self,
        location: Option<String>,
        term: impl Into<String>,
        sort: SortKey,
        coordinate: Option<Coordinate>,
    ) -> Result<(), StateError> {
        let term = term.into();
        self.request(|reply| Command::SetParameters {
            location,
            term,
            sort,
            coordinate,
            reply,
        })
        .await
    }

    /// Clears the location text and any coordinate override.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn clear_location(&self) -> Result<(), StateError> {
        self.request(|reply| Command::ClearLocation { reply }).await
    }

    /// Runs the general and popular searches for the current parameters and
    /// waits for both to finish.
    ///
    /// Loads may overlap. Only the most recently issued load commits its
    /// results; an older one that finishes later returns
    /// [`LoadOutcome::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    /// Fetch failures are not errors here; they are reported through the
    /// outcome and the snapshot's notice.
    pub async fn load(&self) -> Result<LoadOutcome, StateError> {
        self.request(|reply| Command::Load { reply }).await
    }

    /// Fetches one restaurant into the detail slot, replacing whatever was
    /// there. Sequenced the same way as [`QueryStateManager::load`].
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn fetch_detail(&self, id: impl Into<String>) -> Result<DetailOutcome, StateError> {
        let id = id.into();
        self.request(|reply| Command::FetchDetail { id, reply }).await
    }

    /// Saves or unsaves `restaurant`. The snapshot's saved list is already
    /// refreshed when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn toggle_save(&self, restaurant: Restaurant) -> Result<ToggleOutcome, StateError> {
        let restaurant = Box::new(restaurant);
        self.request(|reply| Command::ToggleSave { restaurant, reply })
            .await
    }

    /// Removes a saved restaurant by id. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn remove_saved(&self, id: impl Into<String>) -> Result<bool, StateError> {
        let id = id.into();
        self.request(|reply| Command::RemoveSaved { id, reply }).await
    }

    /// Re-reads the save store into the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn refresh_saved(&self) -> Result<(), StateError> {
        self.request(|reply| Command::RefreshSaved { reply }).await
    }

    /// Points the save store at a different database and refreshes the
    /// saved list from it. The pool must already be migrated.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn reattach_store(&self, pool: SqlitePool) -> Result<(), StateError> {
        self.request(|reply| Command::ReattachStore { pool, reply })
            .await
    }

    /// Clears the notice slot.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ManagerStopped`] if the actor has exited.
    pub async fn dismiss_error(&self) -> Result<(), StateError> {
        self.request(|reply| Command::DismissNotice { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, StateError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| StateError::ManagerStopped)?;
        reply_rx.await.map_err(|_| StateError::ManagerStopped)
    }
}
