//! `search` and `detail` command handlers.

use foodster_core::{Coordinate, Restaurant, SortKey};
use foodster_state::{DetailOutcome, LoadOutcome, NoticeKind, QueryStateManager};

/// Both halves are required together; clap enforces that, this just pairs them.
pub(crate) fn coordinate_from(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinate> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        _ => None,
    }
}

/// Run one load and print the popular strip followed by the main list.
///
/// Saved restaurants are marked with `*`.
///
/// # Errors
///
/// Returns an error if both the location and the coordinate are missing, if
/// the state manager stops, or if the load fails.
pub(crate) async fn run_search(
    manager: &QueryStateManager,
    location: Option<String>,
    coordinate: Option<Coordinate>,
    term: String,
    sort: SortKey,
) -> anyhow::Result<()> {
    let location = location.filter(|l| !l.trim().is_empty());
    if location.is_none() && coordinate.is_none() {
        anyhow::bail!("pass --location or both --latitude and --longitude");
    }

    manager
        .set_parameters(location, term, sort, coordinate)
        .await?;
    let outcome = manager.load().await?;
    let snapshot = manager.snapshot();

    if !snapshot.popular_restaurants.is_empty() {
        println!("Popular nearby");
        for listed in snapshot.listed_popular() {
            print_row(listed.restaurant, listed.saved);
        }
        println!();
    }

    match outcome {
        LoadOutcome::Loaded { .. } => {
            println!("Results");
            for listed in snapshot.listed_restaurants() {
                print_row(listed.restaurant, listed.saved);
            }
            Ok(())
        }
        LoadOutcome::NoResults { .. } => {
            let message = snapshot
                .notice
                .as_ref()
                .filter(|n| n.kind == NoticeKind::NoResults)
                .map_or("no restaurants found", |n| n.message.as_str());
            println!("{message}");
            Ok(())
        }
        LoadOutcome::Failed { message, .. } => {
            for listed in snapshot.listed_restaurants() {
                print_row(listed.restaurant, listed.saved);
            }
            anyhow::bail!(message)
        }
        LoadOutcome::Superseded => Ok(()),
    }
}

/// Fetch and print one restaurant.
///
/// # Errors
///
/// Returns an error if the state manager stops or the fetch fails.
pub(crate) async fn run_detail(manager: &QueryStateManager, id: &str) -> anyhow::Result<()> {
    match manager.fetch_detail(id).await? {
        DetailOutcome::Loaded => {}
        DetailOutcome::Failed { message } => anyhow::bail!(message),
        DetailOutcome::Superseded => return Ok(()),
    }

    let snapshot = manager.snapshot();
    let Some(restaurant) = snapshot.current_detail.as_ref() else {
        anyhow::bail!("restaurant '{id}' was not loaded");
    };

    println!("{}", restaurant.name);
    println!("  {}", restaurant.category_titles().join(", "));
    println!(
        "  {:.1} stars from {} reviews{}",
        restaurant.rating,
        restaurant.review_count,
        restaurant
            .price
            .as_deref()
            .map(|p| format!(" \u{b7} {p}"))
            .unwrap_or_default()
    );
    for line in &restaurant.location.display_address {
        println!("  {line}");
    }
    if !restaurant.display_phone.is_empty() {
        println!("  {}", restaurant.display_phone);
    }
    if let Some(open_now) = restaurant
        .business_hours
        .as_ref()
        .and_then(|hours| hours.first())
        .map(|h| h.is_open_now)
    {
        println!("  {}", if open_now { "Open now" } else { "Closed now" });
    }
    if restaurant.is_closed {
        println!("  Permanently closed");
    }
    println!("  {}", restaurant.url);
    if snapshot.is_saved(&restaurant.id) {
        println!("  * saved");
    }

    Ok(())
}

fn print_row(restaurant: &Restaurant, saved: bool) {
    let marker = if saved { "*" } else { " " };
    let name = if restaurant.name.chars().count() > 40 {
        format!("{}...", restaurant.name.chars().take(40).collect::<String>())
    } else {
        restaurant.name.clone()
    };
    println!(
        "{marker} {:<24}{:<44}{:>4.1}{:>7}  {}",
        restaurant.id,
        name,
        restaurant.rating,
        restaurant.review_count,
        restaurant.price.as_deref().unwrap_or("")
    );
}
