//! The task that owns all query state.
//!
//! Commands arrive on one channel; finished network work arrives on a second
//! channel as [`Completion`]s. Both are handled on this task, so every write
//! to the snapshot happens in one place and in one order.

use std::sync::Arc;

use foodster_core::{Coordinate, Restaurant, SearchRequest, SortKey};
use foodster_db::{SaveStore, SqlitePool, ToggleOutcome};
use foodster_yelp::{RestaurantService, YelpError};
use tokio::sync::{mpsc, oneshot, watch};

use crate::snapshot::{DetailOutcome, LoadOutcome, LoadPhase, Notice, QuerySnapshot};

pub(crate) enum Command {
    SetParameters {
        location: Option<String>,
        term: String,
        sort: SortKey,
        coordinate: Option<Coordinate>,
        reply: oneshot::Sender<()>,
    },
    ClearLocation {
        reply: oneshot::Sender<()>,
    },
    Load {
        reply: oneshot::Sender<LoadOutcome>,
    },
    FetchDetail {
        id: String,
        reply: oneshot::Sender<DetailOutcome>,
    },
    ToggleSave {
        restaurant: Box<Restaurant>,
        reply: oneshot::Sender<ToggleOutcome>,
    },
    RemoveSaved {
        id: String,
        reply: oneshot::Sender<bool>,
    },
    RefreshSaved {
        reply: oneshot::Sender<()>,
    },
    ReattachStore {
        pool: SqlitePool,
        reply: oneshot::Sender<()>,
    },
    DismissNotice {
        reply: oneshot::Sender<()>,
    },
}

pub(crate) enum Completion {
    Load {
        seq: u64,
        general: Result<Vec<Restaurant>, YelpError>,
        popular: Result<Vec<Restaurant>, YelpError>,
        reply: oneshot::Sender<LoadOutcome>,
    },
    Detail {
        seq: u64,
        id: String,
        result: Result<Restaurant, YelpError>,
        reply: oneshot::Sender<DetailOutcome>,
    },
}

pub(crate) struct Actor {
    service: Arc<dyn RestaurantService>,
    store: SaveStore,
    state: QuerySnapshot,
    snapshots: watch::Sender<Arc<QuerySnapshot>>,
    commands: mpsc::Receiver<Command>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    load_seq: u64,
    detail_seq: u64,
}

impl Actor {
    pub(crate) fn new(
        service: Arc<dyn RestaurantService>,
        store: SaveStore,
        commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<Arc<QuerySnapshot>>,
    ) -> Self {
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let state = QuerySnapshot {
            saved: store.saved().to_vec(),
            ..QuerySnapshot::default()
        };
        Self {
            service,
            store,
            state,
            snapshots,
            commands,
            completions,
            completion_tx,
            load_seq: 0,
            detail_seq: 0,
        }
    }

    /// Runs until every manager handle has been dropped. Work still in flight
    /// at that point is abandoned.
    pub(crate) async fn run(mut self) {
        self.publish();
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
            }
        }
        tracing::debug!("query state manager stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetParameters {
                location,
                term,
                sort,
                coordinate,
                reply,
            } => {
                let params = &mut self.state.parameters;
                params.location = location.unwrap_or_default();
                params.term = term;
                params.sort = sort;
                params.coordinate = coordinate;
                self.publish();
                let _ = reply.send(());
            }
            Command::ClearLocation { reply } => {
                self.state.parameters.clear_location();
                self.publish();
                let _ = reply.send(());
            }
            Command::Load { reply } => self.start_load(reply),
            Command::FetchDetail { id, reply } => self.start_detail(id, reply),
            Command::ToggleSave { restaurant, reply } => {
                let outcome = self.store.toggle(&restaurant).await;
                self.refresh_saved().await;
                let _ = reply.send(outcome);
            }
            Command::RemoveSaved { id, reply } => {
                let removed = self.store.remove(&id).await;
                if removed {
                    self.refresh_saved().await;
                }
                let _ = reply.send(removed);
            }
            Command::RefreshSaved { reply } => {
                self.refresh_saved().await;
                let _ = reply.send(());
            }
            Command::ReattachStore { pool, reply } => {
                tracing::info!("reattaching save store");
                self.store.reattach(pool);
                self.refresh_saved().await;
                let _ = reply.send(());
            }
            Command::DismissNotice { reply } => {
                self.state.notice = None;
                self.publish();
                let _ = reply.send(());
            }
        }
    }

    fn start_load(&mut self, reply: oneshot::Sender<LoadOutcome>) {
        self.load_seq += 1;
        let seq = self.load_seq;

        let general_request = self.state.parameters.general_request();
        let popular_request = self.state.parameters.popular_request();
        tracing::info!(
            seq,
            location = %general_request.location,
            term = %general_request.term,
            sort = %general_request.sort,
            "loading restaurants"
        );

        self.state.loading = true;
        self.state.phase = LoadPhase::Loading;
        self.state.notice = None;
        self.publish();

        let service = Arc::clone(&self.service);
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let (general, popular) =
                run_searches(service.as_ref(), &general_request, &popular_request).await;
            // The actor is gone if this fails; the caller sees ManagerStopped.
            let _ = completions.send(Completion::Load {
                seq,
                general,
                popular,
                reply,
            });
        });
    }

    fn start_detail(&mut self, id: String, reply: oneshot::Sender<DetailOutcome>) {
        self.detail_seq += 1;
        let seq = self.detail_seq;
        tracing::info!(seq, %id, "fetching restaurant detail");

        self.state.detail_loading = true;
        self.state.current_detail = None;
        self.publish();

        let service = Arc::clone(&self.service);
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_by_id(&id).await;
            let _ = completions.send(Completion::Detail {
                seq,
                id,
                result,
                reply,
            });
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Load {
                seq,
                general,
                popular,
                reply,
            } => {
                let outcome = if seq == self.load_seq {
                    self.commit_load(general, popular)
                } else {
                    tracing::debug!(seq, latest = self.load_seq, "discarding superseded load");
                    LoadOutcome::Superseded
                };
                let _ = reply.send(outcome);
            }
            Completion::Detail {
                seq,
                id,
                result,
                reply,
            } => {
                let outcome = if seq == self.detail_seq {
                    self.commit_detail(&id, result)
                } else {
                    tracing::debug!(seq, %id, latest = self.detail_seq, "discarding superseded detail");
                    DetailOutcome::Superseded
                };
                let _ = reply.send(outcome);
            }
        }
    }

    fn commit_load(
        &mut self,
        general: Result<Vec<Restaurant>, YelpError>,
        popular: Result<Vec<Restaurant>, YelpError>,
    ) -> LoadOutcome {
        let mut failure: Option<YelpError> = None;

        let general_failed = general.is_err();
        match general {
            Ok(list) => self.state.restaurants = list,
            Err(e) => {
                tracing::warn!(error = %e, "general search failed");
                self.state.restaurants.clear();
                failure = Some(e);
            }
        }

        let popular_failed = popular.is_err();
        match popular {
            Ok(list) => self.state.popular_restaurants = list,
            Err(e) => {
                tracing::warn!(error = %e, "popular search failed");
                self.state.popular_restaurants.clear();
                failure.get_or_insert(e);
            }
        }

        self.state.loading = false;
        let restaurants = self.state.restaurants.len();
        let popular = self.state.popular_restaurants.len();

        let outcome = if let Some(e) = failure {
            let message = format!("Failed to fetch restaurants: {e}");
            self.state.phase = LoadPhase::Failed;
            self.state.notice = Some(Notice::failure(message.clone()));
            LoadOutcome::Failed {
                message,
                general_failed,
                popular_failed,
            }
        } else if restaurants == 0 {
            self.state.phase = LoadPhase::Succeeded;
            self.state.notice = Some(Notice::no_results());
            LoadOutcome::NoResults { popular }
        } else {
            self.state.phase = LoadPhase::Succeeded;
            LoadOutcome::Loaded {
                restaurants,
                popular,
            }
        };

        tracing::info!(restaurants, popular, ?outcome, "load finished");
        self.publish();
        outcome
    }

    fn commit_detail(&mut self, id: &str, result: Result<Restaurant, YelpError>) -> DetailOutcome {
        self.state.detail_loading = false;
        let outcome = match result {
            Ok(restaurant) => {
                tracing::debug!(%id, name = %restaurant.name, "restaurant detail loaded");
                self.state.current_detail = Some(restaurant);
                DetailOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "restaurant detail fetch failed");
                let message = format!("Failed to fetch restaurant details: {e}");
                self.state.current_detail = None;
                self.state.notice = Some(Notice::failure(message.clone()));
                DetailOutcome::Failed { message }
            }
        };
        self.publish();
        outcome
    }

    async fn refresh_saved(&mut self) {
        self.store.refresh().await;
        self.state.saved = self.store.saved().to_vec();
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(Arc::new(self.state.clone()));
    }
}

async fn run_searches(
    service: &dyn RestaurantService,
    general: &SearchRequest,
    popular: &SearchRequest,
) -> (
    Result<Vec<Restaurant>, YelpError>,
    Result<Vec<Restaurant>, YelpError>,
) {
    tokio::join!(service.search(general), service.search(popular))
}
