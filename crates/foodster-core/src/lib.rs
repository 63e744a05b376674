//! Domain model and configuration shared by every Foodster crate.

pub mod app_config;
pub mod config;
pub mod query;
pub mod restaurant;
pub mod saved;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use query::{
    QueryParameters, SearchRequest, SortKey, GENERAL_LIMIT, POPULAR_ATTRIBUTE, POPULAR_LIMIT,
    SEARCH_RADIUS_METERS, TERM_PREFIX,
};
pub use restaurant::{
    Address, Attributes, BusinessHours, Category, Coordinate, OpenHours, Region, Restaurant,
    SearchEnvelope,
};
pub use saved::SavedRestaurant;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sort key: {0} (expected best_match, rating, review_count or distance)")]
    InvalidSortKey(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
