//! `save`, `saved` and `unsave` command handlers.

use foodster_db::{SaveStore, ToggleOutcome};
use foodster_state::{DetailOutcome, QueryStateManager};

/// Fetch a restaurant by id and save it. Does nothing if it is already saved.
///
/// # Errors
///
/// Returns an error if the restaurant cannot be fetched, the state manager
/// stops, or the write fails.
pub(crate) async fn run_save(manager: &QueryStateManager, id: &str) -> anyhow::Result<()> {
    if manager.snapshot().is_saved(id) {
        println!("'{id}' is already saved");
        return Ok(());
    }

    if let DetailOutcome::Failed { message } = manager.fetch_detail(id).await? {
        anyhow::bail!(message);
    }
    let Some(restaurant) = manager.snapshot().current_detail.clone() else {
        anyhow::bail!("restaurant '{id}' was not loaded");
    };

    let name = restaurant.name.clone();
    match manager.toggle_save(restaurant).await? {
        ToggleOutcome::Saved => println!("saved {name}"),
        // Another writer saved it between the check and the toggle.
        ToggleOutcome::Removed => println!("{name} was already saved and has been removed"),
        ToggleOutcome::Failed => anyhow::bail!("could not save {name}; see log for details"),
    }
    Ok(())
}

/// Print the saved list, most recently saved first.
///
/// Reads the store's mirror, which [`SaveStore::open`] has just loaded. Read
/// failures are logged by the store and show as an empty list.
pub(crate) fn run_saved(store: &SaveStore) {
    let saved = store.saved();

    if saved.is_empty() {
        println!("no saved restaurants; run `foodster save <id>` first");
        return;
    }

    println!("{:<24}{:<40}{:<22}SAVED", "ID", "NAME", "CITY");
    for saved in saved {
        println!(
            "{:<24}{:<40}{:<22}{}",
            saved.id,
            saved.name,
            saved.city,
            saved.saved_at.format("%Y-%m-%d %H:%M")
        );
    }
}

/// Remove a restaurant from the saved list. A failed write is logged by the
/// store and reported as not removed.
pub(crate) async fn run_unsave(store: &SaveStore, id: &str) {
    if store.remove(id).await {
        println!("removed '{id}'");
    } else {
        println!("'{id}' is not saved");
    }
}
