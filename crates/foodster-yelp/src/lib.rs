//! Yelp Fusion business API client and the [`RestaurantService`] seam.

pub mod client;
pub mod error;
pub mod service;

#[cfg(any(test, feature = "test-support"))]
pub mod fixture;

pub use client::{YelpClient, REQUEST_TIMEOUT_SECS};
pub use error::{FetchCause, YelpError};
pub use service::RestaurantService;
