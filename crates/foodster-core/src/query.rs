//! Search parameters and the request shapes derived from them.

use serde::{Deserialize, Serialize};

use crate::restaurant::Coordinate;
use crate::CoreError;

/// Search radius in metres (10 miles). Not user-configurable.
pub const SEARCH_RADIUS_METERS: u32 = 16_093;

/// Qualifying word prepended to every search term.
pub const TERM_PREFIX: &str = "restaurant";

/// Result limit for the general list.
pub const GENERAL_LIMIT: u32 = 50;

/// Result limit for the "popular nearby" strip.
pub const POPULAR_LIMIT: u32 = 8;

/// Attribute marker selecting hot-and-new businesses.
pub const POPULAR_ATTRIBUTE: &str = "hot_and_new";

/// Ordering accepted by the search endpoint's `sort_by` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    BestMatch,
    Rating,
    ReviewCount,
    Distance,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::BestMatch => "best_match",
            SortKey::Rating => "rating",
            SortKey::ReviewCount => "review_count",
            SortKey::Distance => "distance",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best_match" => Ok(SortKey::BestMatch),
            "rating" => Ok(SortKey::Rating),
            "review_count" => Ok(SortKey::ReviewCount),
            "distance" => Ok(SortKey::Distance),
            other => Err(CoreError::InvalidSortKey(other.to_string())),
        }
    }
}

/// One outbound `GET /businesses/search` call, before URL encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text location. Takes precedence over `coordinate` when non-empty.
    pub location: String,
    pub coordinate: Option<Coordinate>,
    /// The user's term, without the qualifying prefix.
    pub term: String,
    pub sort: SortKey,
    pub limit: u32,
    pub attributes: Option<String>,
}

impl SearchRequest {
    /// Query pairs in the order they are sent.
    ///
    /// With neither a location nor a coordinate the request carries no
    /// location parameters at all; the upstream API rejects it.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(7);
        if !self.location.is_empty() {
            pairs.push(("location", self.location.clone()));
        } else if let Some(coordinate) = self.coordinate {
            pairs.push(("latitude", coordinate.latitude.to_string()));
            pairs.push(("longitude", coordinate.longitude.to_string()));
        }
        pairs.push(("term", format!("{TERM_PREFIX} {}", self.term)));
        pairs.push(("radius", SEARCH_RADIUS_METERS.to_string()));
        pairs.push(("sort_by", self.sort.as_str().to_string()));
        pairs.push(("limit", self.limit.to_string()));
        if let Some(attributes) = &self.attributes {
            pairs.push(("attributes", attributes.clone()));
        }
        pairs
    }
}

/// Current search inputs held by the query state manager.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    pub location: String,
    pub coordinate: Option<Coordinate>,
    pub term: String,
    pub sort: SortKey,
}

impl QueryParameters {
    /// Empties the location text and drops any coordinate override.
    pub fn clear_location(&mut self) {
        self.location.clear();
        self.coordinate = None;
    }

    /// The main result list: user term and sort, limit 50.
    #[must_use]
    pub fn general_request(&self) -> SearchRequest {
        SearchRequest {
            location: self.location.clone(),
            coordinate: self.coordinate,
            term: self.term.clone(),
            sort: self.sort,
            limit: GENERAL_LIMIT,
            attributes: None,
        }
    }

    /// The popular strip: same place, no term, best match, hot-and-new, limit 8.
    #[must_use]
    pub fn popular_request(&self) -> SearchRequest {
        SearchRequest {
            location: self.location.clone(),
            coordinate: self.coordinate,
            term: String::new(),
            sort: SortKey::BestMatch,
            limit: POPULAR_LIMIT,
            attributes: Some(POPULAR_ATTRIBUTE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn sort_key_round_trips_through_wire_names() {
        for key in [
            SortKey::BestMatch,
            SortKey::Rating,
            SortKey::ReviewCount,
            SortKey::Distance,
        ] {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let err = "cheapest".parse::<SortKey>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidSortKey(ref s) if s == "cheapest"));
    }

    #[test]
    fn chapel_hill_general_and_popular_requests() {
        let params = QueryParameters {
            location: "Chapel Hill".to_string(),
            ..QueryParameters::default()
        };

        let general = params.general_request().query_pairs();
        assert_eq!(pair(&general, "location"), Some("Chapel Hill"));
        assert_eq!(pair(&general, "term"), Some("restaurant "));
        assert_eq!(pair(&general, "radius"), Some("16093"));
        assert_eq!(pair(&general, "sort_by"), Some("best_match"));
        assert_eq!(pair(&general, "limit"), Some("50"));
        assert_eq!(pair(&general, "attributes"), None);

        let popular = params.popular_request().query_pairs();
        assert_eq!(pair(&popular, "location"), Some("Chapel Hill"));
        assert_eq!(pair(&popular, "term"), Some("restaurant "));
        assert_eq!(pair(&popular, "attributes"), Some("hot_and_new"));
        assert_eq!(pair(&popular, "limit"), Some("8"));
    }

    #[test]
    fn popular_request_ignores_user_term_and_sort() {
        let params = QueryParameters {
            location: "Durham".to_string(),
            term: "ramen".to_string(),
            sort: SortKey::Rating,
            ..QueryParameters::default()
        };

        let general = params.general_request().query_pairs();
        assert_eq!(pair(&general, "term"), Some("restaurant ramen"));
        assert_eq!(pair(&general, "sort_by"), Some("rating"));

        let popular = params.popular_request().query_pairs();
        assert_eq!(pair(&popular, "term"), Some("restaurant "));
        assert_eq!(pair(&popular, "sort_by"), Some("best_match"));
    }

    #[test]
    fn coordinate_is_used_when_location_is_empty() {
        let params = QueryParameters {
            coordinate: Some(Coordinate::new(35.9132, -79.0558)),
            ..QueryParameters::default()
        };

        let pairs = params.general_request().query_pairs();
        assert_eq!(pair(&pairs, "location"), None);
        assert_eq!(pair(&pairs, "latitude"), Some("35.9132"));
        assert_eq!(pair(&pairs, "longitude"), Some("-79.0558"));
    }

    #[test]
    fn location_text_wins_over_coordinate() {
        let params = QueryParameters {
            location: "Carrboro".to_string(),
            coordinate: Some(Coordinate::new(1.0, 2.0)),
            ..QueryParameters::default()
        };

        let pairs = params.general_request().query_pairs();
        assert_eq!(pair(&pairs, "location"), Some("Carrboro"));
        assert_eq!(pair(&pairs, "latitude"), None);
        assert_eq!(pair(&pairs, "longitude"), None);
    }

    #[test]
    fn missing_location_and_coordinate_sends_neither() {
        let pairs = QueryParameters::default().general_request().query_pairs();
        assert_eq!(pair(&pairs, "location"), None);
        assert_eq!(pair(&pairs, "latitude"), None);
        assert_eq!(pair(&pairs, "radius"), Some("16093"));
    }

    #[test]
    fn clear_location_drops_coordinate_override() {
        let mut params = QueryParameters {
            location: "Raleigh".to_string(),
            coordinate: Some(Coordinate::new(35.0, -78.0)),
            ..QueryParameters::default()
        };
        params.clear_location();
        assert!(params.location.is_empty());
        assert!(params.coordinate.is_none());
    }
}
