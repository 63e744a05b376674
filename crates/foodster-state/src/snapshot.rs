//! Read-only views of the query state handed to the presentation layer.

use foodster_core::{QueryParameters, Restaurant, SavedRestaurant};

/// Lifecycle of the most recent load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// What kind of message sits in the notice slot.
///
/// `NoResults` is a soft condition the UI renders as an empty state;
/// `Failure` is a transport or decoding error shown as a dismissible alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    NoResults,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub(crate) fn no_results() -> Self {
        Self {
            kind: NoticeKind::NoResults,
            message: "No restaurants found nearby. Try another location.".to_string(),
        }
    }

    pub(crate) fn failure(message: String) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message,
        }
    }
}

/// A restaurant paired with its bookmark state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListedRestaurant<'a> {
    pub restaurant: &'a Restaurant,
    pub saved: bool,
}

/// Everything the presentation layer reads, captured at one instant.
#[derive(Debug, Clone, Default)]
pub struct QuerySnapshot {
    pub parameters: QueryParameters,
    pub phase: LoadPhase,
    pub loading: bool,
    pub restaurants: Vec<Restaurant>,
    pub popular_restaurants: Vec<Restaurant>,
    pub notice: Option<Notice>,
    pub detail_loading: bool,
    pub current_detail: Option<Restaurant>,
    /// The save store's mirror, most recently saved first.
    pub saved: Vec<SavedRestaurant>,
}

impl QuerySnapshot {
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.message.as_str())
    }

    #[must_use]
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.iter().any(|s| s.id == id)
    }

    /// The general results, each marked with its bookmark state.
    #[must_use]
    pub fn listed_restaurants(&self) -> Vec<ListedRestaurant<'_>> {
        self.annotate(&self.restaurants)
    }

    /// The popular strip, each marked with its bookmark state.
    #[must_use]
    pub fn listed_popular(&self) -> Vec<ListedRestaurant<'_>> {
        self.annotate(&self.popular_restaurants)
    }

    /// Saved restaurants projected back for display. See
    /// [`SavedRestaurant::to_restaurant`] for what the projection drops.
    #[must_use]
    pub fn saved_restaurants(&self) -> Vec<Restaurant> {
        self.saved.iter().map(SavedRestaurant::to_restaurant).collect()
    }

    fn annotate<'a>(&'a self, list: &'a [Restaurant]) -> Vec<ListedRestaurant<'a>> {
        list.iter()
            .map(|restaurant| ListedRestaurant {
                restaurant,
                saved: self.is_saved(&restaurant.id),
            })
            .collect()
    }
}

/// How a call to `load` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The general search returned results; both lists were committed.
    Loaded { restaurants: usize, popular: usize },
    /// Both searches succeeded but the general list was empty.
    NoResults { popular: usize },
    /// At least one branch failed. Whatever the other branch fetched was
    /// still committed.
    Failed {
        message: String,
        general_failed: bool,
        popular_failed: bool,
    },
    /// A newer load was issued before this one finished; nothing was
    /// committed.
    Superseded,
}

/// How a call to `fetch_detail` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Loaded,
    Failed { message: String },
    Superseded,
}
