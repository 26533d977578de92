//! PlaceExplorer view-model
//!
//! Owns the filter state, the current place list and the loading flag, and
//! walks one search through its stages:
//!
//! 1. [`PlaceExplorer::viewport_settled`] schedules a debounced search
//! 2. [`PlaceExplorer::quiet_period_elapsed`] turns the surviving ticket into
//!    a [`SearchAction`] using the viewport as it is at that moment
//! 3. [`PlaceExplorer::apply_response`] installs the result of the newest
//!    request; older responses are dropped
//!
//! Nothing here touches the network or a timer directly, so the app and the
//! CLI can each drive it with their own executor.

use std::time::Duration;

use crate::debounce::{Debouncer, Ticket};
use crate::error::PlacesError;
use crate::filters::{Category, SearchFilters};
use crate::geo::Viewport;
use crate::markers::{self, Marker};
use crate::places::{Place, PlacesClient, SearchIntent};

/// Sequence number of an issued request
pub type RequestSeq = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    /// Send this request and report back with `seq`
    Fetch { seq: RequestSeq, intent: SearchIntent },
    /// Every category is off: the list was cleared and nothing is sent
    Cleared,
    /// A newer movement replaced this ticket
    Superseded,
}

#[derive(Debug)]
pub struct PlaceExplorer {
    filters: SearchFilters,
    places: Vec<Place>,
    loading: bool,
    debouncer: Debouncer,
    latest_seq: RequestSeq,
}

impl PlaceExplorer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            filters: SearchFilters::default(),
            places: Vec::new(),
            loading: false,
            debouncer: Debouncer::new(quiet),
            latest_seq: 0,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.debouncer.quiet_period()
    }

    /// The map stopped moving; start (or restart) the quiet period
    pub fn viewport_settled(&mut self) -> Ticket {
        self.debouncer.schedule()
    }

    pub fn quiet_period_elapsed(&mut self, ticket: Ticket, viewport: &Viewport) -> SearchAction {
        if !self.debouncer.fire(ticket) {
            return SearchAction::Superseded;
        }

        // Supersede anything still in flight, including for the empty case
        self.latest_seq += 1;

        match SearchIntent::from_viewport(viewport, &self.filters) {
            Some(intent) => {
                tracing::info!(
                    "Searching {} within {:.0}m of ({:.5}, {:.5})",
                    intent.categories.join(","),
                    intent.radius_m,
                    intent.center.lat,
                    intent.center.lon
                );
                self.loading = true;
                SearchAction::Fetch {
                    seq: self.latest_seq,
                    intent,
                }
            }
            None => {
                tracing::info!("No categories enabled, clearing places");
                self.places.clear();
                self.loading = false;
                SearchAction::Cleared
            }
        }
    }

    /// Install a response. Returns false when it belongs to a superseded request.
    pub fn apply_response(
        &mut self,
        seq: RequestSeq,
        result: Result<Vec<Place>, PlacesError>,
    ) -> bool {
        if seq != self.latest_seq {
            tracing::debug!("Discarding stale response #{} (latest #{})", seq, self.latest_seq);
            return false;
        }

        match result {
            Ok(places) => {
                tracing::info!("Loaded {} places", places.len());
                self.places = places;
            }
            Err(e) => {
                tracing::warn!("Error fetching places: {}", e);
                self.places.clear();
            }
        }
        self.loading = false;
        true
    }

    /// Search `viewport` right away, skipping the quiet period
    pub async fn refresh(&mut self, client: &PlacesClient, viewport: &Viewport) -> SearchAction {
        let ticket = self.viewport_settled();
        let action = self.quiet_period_elapsed(ticket, viewport);
        if let SearchAction::Fetch { seq, intent } = &action {
            let result = client.search(intent).await;
            self.apply_response(*seq, result);
        }
        action
    }

    /// Only affects the next search; the current list stays as is
    pub fn toggle_filter(&mut self, category: Category) {
        self.filters.toggle(category);
        tracing::debug!("Filter {} -> {}", category.label(), self.filters.is_enabled(category));
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn markers(&self) -> Vec<Marker> {
        markers::render(&self.places)
    }

    pub fn status_text(&self) -> String {
        markers::status_text(self.places.len())
    }
}
