//! Locally owned bookmark snapshots.
//!
//! A [`SavedRestaurant`] keeps only the fields the saved-list screen renders.
//! Converting it back with [`SavedRestaurant::to_restaurant`] is lossy on
//! purpose: aliases are synthesised from display text, and transactions,
//! business hours and attributes come back as `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::restaurant::{Address, Category, Coordinate, Restaurant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRestaurant {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub is_closed: bool,
    pub url: String,
    pub review_count: u32,
    pub rating: f64,
    pub price: Option<String>,
    pub phone: String,
    pub display_phone: String,
    pub distance: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// The restaurant's display-address lines.
    pub address: Vec<String>,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub state: String,
    /// Category titles, flattened.
    pub categories: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

impl SavedRestaurant {
    /// Snapshots `restaurant` with the given save time.
    #[must_use]
    pub fn from_restaurant(restaurant: &Restaurant, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
            image_url: restaurant.image_url.clone(),
            is_closed: restaurant.is_closed,
            url: restaurant.url.clone(),
            review_count: restaurant.review_count,
            rating: restaurant.rating,
            price: restaurant.price.clone(),
            phone: restaurant.phone.clone(),
            display_phone: restaurant.display_phone.clone(),
            distance: restaurant.distance,
            latitude: restaurant.coordinates.latitude,
            longitude: restaurant.coordinates.longitude,
            address: restaurant.location.display_address.clone(),
            city: restaurant.location.city.clone(),
            zip_code: restaurant.location.zip_code.clone(),
            country: restaurant.location.country.clone(),
            state: restaurant.location.state.clone(),
            categories: restaurant.category_titles(),
            saved_at,
        }
    }

    /// Rebuilds a displayable [`Restaurant`] from the snapshot.
    #[must_use]
    pub fn to_restaurant(&self) -> Restaurant {
        let location = Address {
            address1: Some(self.address.first().cloned().unwrap_or_default()),
            address2: self.address.get(1).cloned(),
            address3: self.address.get(2).cloned(),
            city: self.city.clone(),
            zip_code: self.zip_code.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
            display_address: self.address.clone(),
        };

        let categories = self
            .categories
            .iter()
            .map(|title| Category {
                alias: title.to_lowercase().replace(' ', "_"),
                title: title.clone(),
            })
            .collect();

        Restaurant {
            id: self.id.clone(),
            alias: self.name.to_lowercase().replace(' ', "-"),
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            is_closed: self.is_closed,
            url: self.url.clone(),
            review_count: self.review_count,
            categories,
            rating: self.rating,
            coordinates: Coordinate::new(self.latitude, self.longitude),
            transactions: None,
            price: self.price.clone(),
            location,
            phone: self.phone.clone(),
            display_phone: self.display_phone.clone(),
            distance: self.distance,
            business_hours: None,
            attributes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::restaurant::{Attributes, BusinessHours};

    fn sample() -> Restaurant {
        Restaurant {
            id: "abc123".to_string(),
            alias: "top-of-the-hill-chapel-hill".to_string(),
            name: "Top of the Hill".to_string(),
            image_url: Some("https://example.com/toth.jpg".to_string()),
            is_closed: false,
            url: "https://www.yelp.com/biz/top-of-the-hill-chapel-hill".to_string(),
            review_count: 812,
            categories: vec![
                Category {
                    alias: "newamerican".to_string(),
                    title: "American (New)".to_string(),
                },
                Category {
                    alias: "breweries".to_string(),
                    title: "Breweries".to_string(),
                },
            ],
            rating: 4.0,
            coordinates: Coordinate::new(35.9131, -79.0557),
            transactions: Some(vec!["delivery".to_string()]),
            price: Some("$$".to_string()),
            location: Address {
                address1: Some("100 E Franklin St".to_string()),
                address2: Some("Fl 3".to_string()),
                address3: None,
                city: "Chapel Hill".to_string(),
                zip_code: "27514".to_string(),
                country: "US".to_string(),
                state: "NC".to_string(),
                display_address: vec![
                    "100 E Franklin St".to_string(),
                    "Fl 3".to_string(),
                    "Chapel Hill, NC 27514".to_string(),
                ],
            },
            phone: "+19199298676".to_string(),
            display_phone: "(919) 929-8676".to_string(),
            distance: 120.5,
            business_hours: Some(vec![BusinessHours::default()]),
            attributes: Some(Attributes::default()),
        }
    }

    #[test]
    fn snapshot_flattens_categories_and_address() {
        let at = Utc.with_ymd_and_hms(2025, 4, 19, 12, 0, 0).unwrap();
        let saved = SavedRestaurant::from_restaurant(&sample(), at);

        assert_eq!(saved.id, "abc123");
        assert_eq!(saved.categories, vec!["American (New)", "Breweries"]);
        assert_eq!(saved.address.len(), 3);
        assert_eq!(saved.city, "Chapel Hill");
        assert_eq!(saved.saved_at, at);
    }

    #[test]
    fn projection_back_is_lossy_by_contract() {
        let saved = SavedRestaurant::from_restaurant(&sample(), Utc::now());
        let restored = saved.to_restaurant();

        assert_eq!(restored.id, "abc123");
        assert_eq!(restored.alias, "top-of-the-hill");
        assert_eq!(restored.categories[0].alias, "american_(new)");
        assert_eq!(restored.categories[0].title, "American (New)");
        assert_eq!(restored.location.address1.as_deref(), Some("100 E Franklin St"));
        assert_eq!(restored.location.address2.as_deref(), Some("Fl 3"));
        assert_eq!(
            restored.location.address3.as_deref(),
            Some("Chapel Hill, NC 27514")
        );
        assert!(restored.transactions.is_none());
        assert!(restored.business_hours.is_none());
        assert!(restored.attributes.is_none());
        assert_eq!(restored.price.as_deref(), Some("$$"));
    }

    #[test]
    fn projection_with_no_address_lines_uses_empty_first_line() {
        let mut restaurant = sample();
        restaurant.location.display_address.clear();
        let restored = SavedRestaurant::from_restaurant(&restaurant, Utc::now()).to_restaurant();

        assert_eq!(restored.location.address1.as_deref(), Some(""));
        assert!(restored.location.address2.is_none());
    }
}
