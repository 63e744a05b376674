//! The seam the query state manager fetches through.
//!
//! [`YelpClient`] is the live implementation; tests substitute
//! `FixtureService` from the `test-support` feature.

use async_trait::async_trait;
use foodster_core::{Restaurant, SearchRequest};

use crate::client::YelpClient;
use crate::error::YelpError;

#[async_trait]
pub trait RestaurantService: Send + Sync {
    /// Runs one business search and returns the matching restaurants.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Restaurant>, YelpError>;

    /// Fetches a single business by id.
    async fn fetch_by_id(&self, id: &str) -> Result<Restaurant, YelpError>;
}

#[async_trait]
impl RestaurantService for YelpClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Restaurant>, YelpError> {
        YelpClient::search(self, request).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Restaurant, YelpError> {
        YelpClient::fetch_by_id(self, id).await
    }
}
