//! Fixture-backed [`RestaurantService`] for tests.
//!
//! Responses are canned per request kind (general or popular) and may be
//! overridden per location string. Every request is recorded so tests can
//! assert on exactly what would have gone over the wire.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use foodster_core::{Address, Category, Coordinate, Restaurant, SearchRequest};
use serde::de::Error as _;
use tokio::sync::Barrier;

use crate::error::{FetchCause, YelpError};
use crate::service::RestaurantService;

/// What a fixture call answers with.
#[derive(Debug, Clone)]
pub enum FixtureResponse {
    Businesses(Vec<Restaurant>),
    /// A non-2xx HTTP status.
    Status(u16),
    /// A 2xx response whose body does not decode.
    Malformed,
}

impl FixtureResponse {
    fn into_search_result(self) -> Result<Vec<Restaurant>, YelpError> {
        match self {
            FixtureResponse::Businesses(list) => Ok(list),
            FixtureResponse::Status(status) => Err(YelpError::SearchFailed(FetchCause::Status {
                status,
                body: String::new(),
            })),
            FixtureResponse::Malformed => Err(malformed("businesses/search")),
        }
    }
}

fn malformed(context: &str) -> YelpError {
    YelpError::DecodeFailed {
        context: context.to_string(),
        source: serde_json::Error::custom("fixture payload is not valid JSON"),
    }
}

#[derive(Debug, Default)]
struct FixtureState {
    general: Option<FixtureResponse>,
    popular: Option<FixtureResponse>,
    general_by_location: HashMap<String, FixtureResponse>,
    popular_by_location: HashMap<String, FixtureResponse>,
    delays_by_location: HashMap<String, Duration>,
    details: HashMap<String, FixtureResponse>,
    detail_delays: HashMap<String, Duration>,
    requests: Vec<SearchRequest>,
    detail_requests: Vec<String>,
}

/// In-memory stand-in for the Yelp API.
#[derive(Debug, Default)]
pub struct FixtureService {
    state: Mutex<FixtureState>,
    rendezvous: Option<Barrier>,
}

impl FixtureService {
    /// A fixture answering every search with an empty list and every detail
    /// lookup with 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_general(mut self, response: FixtureResponse) -> Self {
        self.state_mut().general = Some(response);
        self
    }

    #[must_use]
    pub fn with_popular(mut self, response: FixtureResponse) -> Self {
        self.state_mut().popular = Some(response);
        self
    }

    #[must_use]
    pub fn with_general_for(mut self, location: &str, response: FixtureResponse) -> Self {
        self.state_mut()
            .general_by_location
            .insert(location.to_string(), response);
        self
    }

    #[must_use]
    pub fn with_popular_for(mut self, location: &str, response: FixtureResponse) -> Self {
        self.state_mut()
            .popular_by_location
            .insert(location.to_string(), response);
        self
    }

    /// Delays both searches for `location` before they answer.
    #[must_use]
    pub fn with_delay_for(mut self, location: &str, delay: Duration) -> Self {
        self.state_mut()
            .delays_by_location
            .insert(location.to_string(), delay);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, restaurant: Restaurant) -> Self {
        let id = restaurant.id.clone();
        self.state_mut()
            .details
            .insert(id, FixtureResponse::Businesses(vec![restaurant]));
        self
    }

    #[must_use]
    pub fn with_detail_response(mut self, id: &str, response: FixtureResponse) -> Self {
        self.state_mut().details.insert(id.to_string(), response);
        self
    }

    #[must_use]
    pub fn with_detail_delay(mut self, id: &str, delay: Duration) -> Self {
        self.state_mut().detail_delays.insert(id.to_string(), delay);
        self
    }

    /// Makes searches answer only in pairs: each call waits until a second
    /// call is in flight. A caller that issues searches one after another
    /// never completes.
    #[must_use]
    pub fn with_rendezvous(mut self) -> Self {
        self.rendezvous = Some(Barrier::new(2));
        self
    }

    /// Replaces the default general response for subsequent calls.
    pub fn set_general(&self, response: FixtureResponse) {
        self.lock().general = Some(response);
    }

    /// Every search request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.lock().requests.clone()
    }

    /// Every detail id requested so far, in arrival order.
    #[must_use]
    pub fn detail_requests(&self) -> Vec<String> {
        self.lock().detail_requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut FixtureState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RestaurantService for FixtureService {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Restaurant>, YelpError> {
        let (response, delay) = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            let response = if request.attributes.is_some() {
                state
                    .popular_by_location
                    .get(&request.location)
                    .or(state.popular.as_ref())
                    .cloned()
            } else {
                state
                    .general_by_location
                    .get(&request.location)
                    .or(state.general.as_ref())
                    .cloned()
            };
            (
                response.unwrap_or(FixtureResponse::Businesses(Vec::new())),
                state.delays_by_location.get(&request.location).copied(),
            )
        };

        if let Some(barrier) = &self.rendezvous {
            barrier.wait().await;
        }
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response.into_search_result()
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Restaurant, YelpError> {
        let (response, delay) = {
            let mut state = self.lock();
            state.detail_requests.push(id.to_string());
            (
                state.details.get(id).cloned(),
                state.detail_delays.get(id).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let not_found = || YelpError::DetailFetchFailed {
            id: id.to_string(),
            cause: FetchCause::Status {
                status: 404,
                body: String::new(),
            },
        };
        match response {
            Some(FixtureResponse::Businesses(list)) => list.into_iter().next().ok_or_else(not_found),
            Some(FixtureResponse::Status(status)) => Err(YelpError::DetailFetchFailed {
                id: id.to_string(),
                cause: FetchCause::Status {
                    status,
                    body: String::new(),
                },
            }),
            Some(FixtureResponse::Malformed) => Err(malformed(&format!("businesses/{id}"))),
            None => Err(not_found()),
        }
    }
}

/// A plausible restaurant record for tests.
#[must_use]
pub fn sample_restaurant(id: &str, name: &str) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        alias: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        image_url: Some(format!("https://s3-media.example.com/{id}.jpg")),
        is_closed: false,
        url: format!("https://www.yelp.com/biz/{id}"),
        review_count: 120,
        categories: vec![Category {
            alias: "pizza".to_string(),
            title: "Pizza".to_string(),
        }],
        rating: 4.5,
        coordinates: Coordinate::new(35.9132, -79.0558),
        transactions: Some(vec!["pickup".to_string()]),
        price: Some("$$".to_string()),
        location: Address {
            address1: Some("100 W Franklin St".to_string()),
            address2: None,
            address3: None,
            city: "Chapel Hill".to_string(),
            zip_code: "27516".to_string(),
            country: "US".to_string(),
            state: "NC".to_string(),
            display_address: vec![
                "100 W Franklin St".to_string(),
                "Chapel Hill, NC 27516".to_string(),
            ],
        },
        phone: "+19195550100".to_string(),
        display_phone: "(919) 555-0100".to_string(),
        distance: 250.0,
        business_hours: None,
        attributes: None,
    }
}
