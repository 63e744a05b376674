//! Restaurant records as returned by the Yelp business endpoints.
//!
//! `id` is the only field the rest of the system relies on as a stable key.
//! Every other field may be absent or `null`, at any nesting depth, and falls
//! back to an empty string, zero or empty list. One sparse record must not
//! fail a whole search page.

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes `null` as `T::default()`. Paired with `#[serde(default)]`, which
/// covers the key being absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A business returned by the search or detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_closed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    /// Yelp publishes ratings in half-star steps between 0.0 and 5.0; the
    /// value is passed through unchecked.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Coordinate,
    #[serde(default)]
    pub transactions: Option<Vec<String>>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_phone: String,
    /// Distance in metres from the search origin.
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: f64,
    #[serde(default)]
    pub business_hours: Option<Vec<BusinessHours>>,
    #[serde(default)]
    pub attributes: Option<Attributes>,
}

impl Restaurant {
    /// Category titles in source order, e.g. `["Pizza", "Italian"]`.
    #[must_use]
    pub fn category_titles(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.title.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Postal address block of a business (`location` in the Yelp payload).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub address3: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// Pre-formatted address lines, e.g. `["123 Main St", "Chapel Hill, NC 27514"]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_address: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(default, deserialize_with = "null_as_default")]
    pub open: Vec<OpenHours>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hours_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_open_now: bool,
}

/// One opening span. `start`/`end` are `HHMM` strings and `day` counts from
/// 0 (Monday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHours {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_overnight: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub day: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub business_temp_closed: Option<bool>,
    #[serde(default)]
    pub menu_url: Option<String>,
    #[serde(default)]
    pub open24_hours: Option<bool>,
    #[serde(default)]
    pub waitlist_reservation: Option<bool>,
}

/// Center of the area a search covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, deserialize_with = "null_as_default")]
    pub center: Coordinate,
}

/// Top-level body of `GET /businesses/search`.
///
/// Only `businesses` is consumed downstream; `total` and `region` are kept
/// for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub businesses: Vec<Restaurant>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub region: Option<Region>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_business_decodes_with_defaults() {
        let json = r#"{ "id": "abc123", "name": "Lantern" }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();

        assert_eq!(restaurant.id, "abc123");
        assert_eq!(restaurant.name, "Lantern");
        assert!(restaurant.image_url.is_none());
        assert!(restaurant.categories.is_empty());
        assert_eq!(restaurant.review_count, 0);
        assert!(restaurant.location.display_address.is_empty());
        assert!(restaurant.business_hours.is_none());
    }

    #[test]
    fn full_business_decodes_nested_blocks() {
        let json = r#"{
            "id": "xyz",
            "alias": "mama-dips-kitchen-chapel-hill",
            "name": "Mama Dip's Kitchen",
            "image_url": "https://example.com/a.jpg",
            "is_closed": false,
            "url": "https://www.yelp.com/biz/mama-dips-kitchen-chapel-hill",
            "review_count": 1234,
            "categories": [{ "alias": "southern", "title": "Southern" }],
            "rating": 4.5,
            "coordinates": { "latitude": 35.9132, "longitude": -79.0558 },
            "transactions": ["pickup", "delivery"],
            "price": "$$",
            "location": {
                "address1": "408 W Rosemary St",
                "address2": "",
                "address3": null,
                "city": "Chapel Hill",
                "zip_code": "27516",
                "country": "US",
                "state": "NC",
                "display_address": ["408 W Rosemary St", "Chapel Hill, NC 27516"]
            },
            "phone": "+19199425837",
            "display_phone": "(919) 942-5837",
            "distance": 812.4,
            "business_hours": [{
                "open": [{ "is_overnight": false, "start": "0800", "end": "2100", "day": 0 }],
                "hours_type": "REGULAR",
                "is_open_now": true
            }],
            "attributes": { "menu_url": "https://example.com/menu", "open24_hours": null }
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();

        assert_eq!(restaurant.category_titles(), vec!["Southern".to_string()]);
        assert!((restaurant.coordinates.latitude - 35.9132).abs() < f64::EPSILON);
        assert_eq!(restaurant.location.zip_code, "27516");
        assert_eq!(restaurant.price.as_deref(), Some("$$"));
        let hours = restaurant.business_hours.unwrap();
        assert!(hours[0].is_open_now);
        assert_eq!(hours[0].open[0].start, "0800");
        assert_eq!(
            restaurant.attributes.unwrap().menu_url.as_deref(),
            Some("https://example.com/menu")
        );
    }

    #[test]
    fn one_sparse_record_does_not_fail_the_page() {
        let json = r#"{
            "businesses": [
                { "id": "good", "name": "Lantern", "coordinates": { "latitude": 35.9, "longitude": -79.0 } },
                { "id": "null-coords", "coordinates": { "latitude": null, "longitude": null } },
                { "id": "empty-coords", "coordinates": {} },
                { "id": "null-fields", "name": null, "phone": null, "review_count": null,
                  "categories": null, "location": null, "coordinates": null }
            ],
            "total": 4,
            "region": { "center": null }
        }"#;
        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();

        let ids: Vec<_> = envelope.businesses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["good", "null-coords", "empty-coords", "null-fields"]);
        assert_eq!(envelope.businesses[1].coordinates, Coordinate::default());
        assert_eq!(envelope.businesses[2].coordinates, Coordinate::default());

        let sparse = &envelope.businesses[3];
        assert!(sparse.name.is_empty());
        assert!(sparse.phone.is_empty());
        assert_eq!(sparse.review_count, 0);
        assert!(sparse.categories.is_empty());
        assert_eq!(sparse.location, Address::default());
        assert_eq!(envelope.region.map(|r| r.center), Some(Coordinate::default()));
    }

    #[test]
    fn partial_opening_hours_decode_with_defaults() {
        let json = r#"{
            "id": "abc",
            "business_hours": [{ "open": [{ "start": "1100", "end": null }], "is_open_now": null }]
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();

        let hours = restaurant.business_hours.unwrap();
        assert!(!hours[0].is_open_now);
        assert_eq!(hours[0].open[0].start, "1100");
        assert!(hours[0].open[0].end.is_empty());
        assert_eq!(hours[0].open[0].day, 0);
    }

    #[test]
    fn envelope_tolerates_missing_total_and_region() {
        let envelope: SearchEnvelope =
            serde_json::from_str(r#"{ "businesses": [{ "id": "a" }] }"#).unwrap();
        assert_eq!(envelope.businesses.len(), 1);
        assert!(envelope.total.is_none());
        assert!(envelope.region.is_none());
    }
}
