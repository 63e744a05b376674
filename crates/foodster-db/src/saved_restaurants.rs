//! Database operations for the `saved_restaurants` table.

use chrono::{DateTime, Utc};
use foodster_core::SavedRestaurant;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `saved_restaurants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedRestaurantRow {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub is_closed: bool,
    pub url: String,
    pub review_count: i64,
    pub rating: f64,
    pub price: Option<String>,
    pub phone: String,
    pub display_phone: String,
    pub distance: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Json<Vec<String>>,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub state: String,
    pub categories: Json<Vec<String>>,
    pub saved_at: DateTime<Utc>,
}

impl From<SavedRestaurantRow> for SavedRestaurant {
    fn from(row: SavedRestaurantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            is_closed: row.is_closed,
            url: row.url,
            review_count: u32::try_from(row.review_count).unwrap_or(0),
            rating: row.rating,
            price: row.price,
            phone: row.phone,
            display_phone: row.display_phone,
            distance: row.distance,
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address.0,
            city: row.city,
            zip_code: row.zip_code,
            country: row.country,
            state: row.state,
            categories: row.categories.0,
            saved_at: row.saved_at,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, image_url, is_closed, url, review_count, rating, \
            price, phone, display_phone, distance, latitude, longitude, address, city, \
            zip_code, country, state, categories, saved_at \
     FROM saved_restaurants";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every saved restaurant, most recently saved first.
///
/// Rows saved within the same timestamp fall back to insertion order,
/// newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_saved_restaurants(pool: &SqlitePool) -> Result<Vec<SavedRestaurantRow>, DbError> {
    let rows = sqlx::query_as::<_, SavedRestaurantRow>(&format!(
        "{SELECT_COLUMNS} ORDER BY saved_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single saved restaurant by Yelp id, or `None` if not saved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_saved_restaurant(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<SavedRestaurantRow>, DbError> {
    let row = sqlx::query_as::<_, SavedRestaurantRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Returns whether a restaurant with `id` is saved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn saved_restaurant_exists(pool: &SqlitePool, id: &str) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM saved_restaurants WHERE id = ?1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Inserts a snapshot row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, including a primary-key
/// violation when `saved.id` is already saved.
pub async fn insert_saved_restaurant(
    pool: &SqlitePool,
    saved: &SavedRestaurant,
) -> Result<(), DbError> {
    insert_row(pool, saved).await
}

/// Deletes the row for `id`. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_saved_restaurant(pool: &SqlitePool, id: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM saved_restaurants WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Deletes the row for `saved.id` if present, otherwise inserts `saved`.
///
/// Runs in one transaction so two concurrent toggles of the same id cannot
/// both insert. Returns `true` when the restaurant ended up saved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails; the
/// transaction is rolled back in that case.
pub async fn toggle_saved_restaurant(
    pool: &SqlitePool,
    saved: &SavedRestaurant,
) -> Result<bool, DbError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM saved_restaurants WHERE id = ?1")
        .bind(&saved.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        insert_row(&mut *tx, saved).await?;
    }

    tx.commit().await?;
    Ok(deleted == 0)
}

async fn insert_row<'e, E>(executor: E, saved: &SavedRestaurant) -> Result<(), DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO saved_restaurants \
           (id, name, image_url, is_closed, url, review_count, rating, price, phone, \
            display_phone, distance, latitude, longitude, address, city, zip_code, country, \
            state, categories, saved_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
                 ?18, ?19, ?20)",
    )
    .bind(&saved.id)
    .bind(&saved.name)
    .bind(&saved.image_url)
    .bind(saved.is_closed)
    .bind(&saved.url)
    .bind(i64::from(saved.review_count))
    .bind(saved.rating)
    .bind(&saved.price)
    .bind(&saved.phone)
    .bind(&saved.display_phone)
    .bind(saved.distance)
    .bind(saved.latitude)
    .bind(saved.longitude)
    .bind(Json(&saved.address))
    .bind(&saved.city)
    .bind(&saved.zip_code)
    .bind(&saved.country)
    .bind(&saved.state)
    .bind(Json(&saved.categories))
    .bind(saved.saved_at)
    .execute(executor)
    .await?;
    Ok(())
}
