//! The local save store: bookmark toggling with an in-memory mirror.
//!
//! Saving is best-effort. Every persistence failure is logged and then
//! degraded (empty list, `false`, [`ToggleOutcome::Failed`]) instead of
//! being returned to the caller. The mirror returned by [`SaveStore::saved`]
//! only changes on [`SaveStore::refresh`]; callers refresh after each
//! mutation and after [`SaveStore::reattach`].

use chrono::Utc;
use foodster_core::{Restaurant, SavedRestaurant};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::saved_restaurants::{
    get_saved_restaurant, list_saved_restaurants, saved_restaurant_exists,
    toggle_saved_restaurant,
};
use crate::{connect_pool, run_migrations, DbError, PoolConfig};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read saved restaurants: {0}")]
    ReadFailed(#[source] DbError),

    #[error("failed to write saved restaurants: {0}")]
    WriteFailed(#[source] DbError),
}

/// Result of [`SaveStore::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new snapshot was inserted.
    Saved,
    /// The existing snapshot was deleted.
    Removed,
    /// The write failed and the table is unchanged.
    Failed,
}

#[derive(Debug)]
pub struct SaveStore {
    pool: SqlitePool,
    mirror: Vec<SavedRestaurant>,
}

impl SaveStore {
    /// Wraps an already-migrated pool. The mirror starts empty.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            mirror: Vec::new(),
        }
    }

    /// Connects, applies migrations and loads the mirror.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    /// Opening is the one place persistence failures propagate: without a
    /// table there is nothing to degrade to.
    pub async fn open(database_url: &str, config: PoolConfig) -> Result<Self, DbError> {
        let pool = connect_pool(database_url, config).await?;
        let applied = run_migrations(&pool).await?;
        tracing::debug!(applied, "save store migrations applied");

        let mut store = Self::new(pool);
        store.refresh().await;
        Ok(store)
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The in-memory mirror as of the last [`SaveStore::refresh`], most
    /// recently saved first.
    #[must_use]
    pub fn saved(&self) -> &[SavedRestaurant] {
        &self.mirror
    }

    /// Reads all saved restaurants, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReadFailed`] if the query fails.
    pub async fn try_list(&self) -> Result<Vec<SavedRestaurant>, StoreError> {
        let rows = list_saved_restaurants(&self.pool)
            .await
            .map_err(StoreError::ReadFailed)?;
        Ok(rows.into_iter().map(SavedRestaurant::from).collect())
    }

    /// Reads all saved restaurants, most recently saved first. Empty on failure.
    pub async fn list(&self) -> Vec<SavedRestaurant> {
        match self.try_list().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "listing saved restaurants failed; showing none");
                Vec::new()
            }
        }
    }

    /// Whether `id` is saved. `false` on failure.
    pub async fn is_saved(&self, id: &str) -> bool {
        match saved_restaurant_exists(&self.pool, id).await {
            Ok(exists) => exists,
            Err(e) => {
                let e = StoreError::ReadFailed(e);
                tracing::warn!(id, error = %e, "saved-state lookup failed; reporting unsaved");
                false
            }
        }
    }

    /// The stored snapshot for `id`. `None` when absent or on failure.
    pub async fn get(&self, id: &str) -> Option<SavedRestaurant> {
        match get_saved_restaurant(&self.pool, id).await {
            Ok(row) => row.map(SavedRestaurant::from),
            Err(e) => {
                let e = StoreError::ReadFailed(e);
                tracing::warn!(id, error = %e, "saved restaurant lookup failed");
                None
            }
        }
    }

    /// Deletes the snapshot for `restaurant.id` if one exists, otherwise
    /// saves a new snapshot stamped with the current time.
    ///
    /// This is the only mutation the store offers. The mirror is not touched;
    /// call [`SaveStore::refresh`] afterwards.
    pub async fn toggle(&self, restaurant: &Restaurant) -> ToggleOutcome {
        let snapshot = SavedRestaurant::from_restaurant(restaurant, Utc::now());
        match toggle_saved_restaurant(&self.pool, &snapshot).await {
            Ok(true) => {
                tracing::info!(id = %restaurant.id, name = %restaurant.name, "restaurant saved");
                ToggleOutcome::Saved
            }
            Ok(false) => {
                tracing::info!(id = %restaurant.id, name = %restaurant.name, "restaurant unsaved");
                ToggleOutcome::Removed
            }
            Err(e) => {
                let e = StoreError::WriteFailed(e);
                tracing::warn!(id = %restaurant.id, error = %e, "toggling saved restaurant failed");
                ToggleOutcome::Failed
            }
        }
    }

    /// Removes `id` from the saved list by toggling its stored snapshot.
    /// Returns `true` if a row was removed; `false` if `id` was not saved or
    /// the write failed.
    pub async fn remove(&self, id: &str) -> bool {
        match self.get(id).await {
            Some(saved) => self.toggle(&saved.to_restaurant()).await == ToggleOutcome::Removed,
            None => {
                tracing::debug!(id, "remove requested for restaurant that is not saved");
                false
            }
        }
    }

    /// Re-reads the whole table into the mirror.
    pub async fn refresh(&mut self) {
        self.mirror = self.list().await;
        tracing::debug!(count = self.mirror.len(), "saved restaurants refreshed");
    }

    /// Swaps in a different pool, e.g. after the app re-attaches storage.
    /// The mirror keeps its old contents until the next refresh.
    pub fn reattach(&mut self, pool: SqlitePool) {
        self.pool = pool;
    }
}
