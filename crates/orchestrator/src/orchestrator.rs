//! # Recommendation Orchestrator
//!
//! Owns the page session's request/pagination state and drives two actions:
//! 1. **Submit**: replace the results with the first page for a new answer set
//! 2. **LoadMore**: append the next page for the current answer set
//!
//! ## Staleness
//! Calls suspend at the network boundary and nothing is cancelled. Every
//! Submit bumps a generation counter; a response whose generation no longer
//! matches is discarded without touching the display.
//!
//! ## Cleanup
//! Each action arms an [`ActionGuard`] before suspending. Dropping it clears
//! the in-flight flag and restores the control, whether the call succeeded,
//! failed, went stale or the future was dropped mid-flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use api_client::RecommendationService;
use survey_model::{
    serialize_answers, Answer, Cursor, FormState, RecommendationRequest, RecommendationResponse,
};

use crate::page::PageModel;
use crate::projector::{AccessibilityProjector, VALIDATION_MESSAGE};
use crate::render::{render_charity, CharityCard};

/// Request/pagination state for one page session.
///
/// Created empty on page load and mutated only by the two actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorState {
    last_answers: Vec<Answer>,
    cursor: Option<Cursor>,
    submit_in_flight: bool,
    load_more_in_flight: bool,
}

impl OrchestratorState {
    pub fn last_answers(&self) -> &[Answer] {
        &self.last_answers
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    pub fn load_more_in_flight(&self) -> bool {
        self.load_more_in_flight
    }

    /// Pagination is possible iff the service handed back a cursor
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }
}

/// What an action ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Results were shown; `added` new cards, `total` now displayed
    Rendered { added: usize, total: usize, has_more: bool },
    /// Submit succeeded with zero results; the empty state is shown
    Empty,
    /// Submit was rejected locally and never reached the network
    Invalid(String),
    /// The call failed; the message is in the live region
    Failed(String),
    /// LoadMore preconditions didn't hold; nothing was sent
    Skipped,
    /// A newer Submit superseded this call; its response was dropped
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Submit,
    LoadMore,
}

#[derive(Debug, Default)]
struct Session {
    state: OrchestratorState,
    generation: u64,
    projector: AccessibilityProjector,
}

impl Session {
    fn sync_busy(&mut self) {
        self.projector
            .sync_busy(self.state.submit_in_flight, self.state.load_more_in_flight);
    }

    fn finish(&mut self, action: Action, generation: u64) {
        match action {
            // A superseded Submit leaves the flag to the newer one
            Action::Submit if generation == self.generation => {
                self.state.submit_in_flight = false;
                self.projector.submit_finished();
            }
            Action::Submit => {}
            Action::LoadMore => {
                self.state.load_more_in_flight = false;
                self.projector.load_more_finished();
            }
        }
        self.sync_busy();
    }

    fn apply_first_page(&mut self, response: RecommendationResponse) -> ActionOutcome {
        let cards = render_all(&response);
        let count = cards.len();

        self.state.cursor = response.cursor;
        self.projector.replace_results(cards, response.explain.rationale);
        self.projector.set_load_more_visible(self.state.has_more());

        if count == 0 {
            ActionOutcome::Empty
        } else {
            ActionOutcome::Rendered {
                added: count,
                total: count,
                has_more: self.state.has_more(),
            }
        }
    }

    fn apply_next_page(&mut self, response: RecommendationResponse) -> ActionOutcome {
        if response.explain.cursor_expired() {
            warn!("Pagination cursor expired; the service asked for a fresh submission");
        }

        let cards = render_all(&response);
        let added = cards.len();

        self.state.cursor = response.cursor;
        self.projector.append_results(cards, response.explain.rationale);
        self.projector.set_load_more_visible(self.state.has_more());

        ActionOutcome::Rendered {
            added,
            total: self.projector.page().cards.len(),
            has_more: self.state.has_more(),
        }
    }
}

fn render_all(response: &RecommendationResponse) -> Vec<CharityCard> {
    response.charities.iter().map(render_charity).collect()
}

fn lock(inner: &Mutex<Session>) -> MutexGuard<'_, Session> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Finally-style cleanup for one in-flight action
struct ActionGuard<'a> {
    inner: &'a Mutex<Session>,
    action: Action,
    generation: u64,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        lock(self.inner).finish(self.action, self.generation);
    }
}

/// Handle to one page session's orchestrator.
///
/// Clones share the same session, so the handle can be passed into every
/// event handler on the page.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    service: Arc<dyn RecommendationService>,
    inner: Arc<Mutex<Session>>,
}

impl RecommendationOrchestrator {
    /// Start a page session with empty state
    pub fn new(service: Arc<dyn RecommendationService>) -> Self {
        Self {
            service,
            inner: Arc::new(Mutex::new(Session::default())),
        }
    }

    /// Read-only snapshot of the request/pagination state
    pub fn state(&self) -> OrchestratorState {
        lock(&self.inner).state.clone()
    }

    /// Read-only snapshot of the interface
    pub fn page(&self) -> PageModel {
        lock(&self.inner).projector.page().clone()
    }

    /// Form input/change event: refresh the answered-required counter
    pub fn form_changed(&self, form: &FormState) {
        lock(&self.inner).projector.form_changed(form);
    }

    /// Serialize the form and submit it
    pub async fn submit_form(&self, form: &FormState) -> ActionOutcome {
        self.submit(serialize_answers(form)).await
    }

    /// Submit a new answer set, replacing whatever is displayed.
    pub async fn submit(&self, answers: Vec<Answer>) -> ActionOutcome {
        let generation = {
            let mut session = lock(&self.inner);
            if answers.is_empty() {
                warn!("Submit rejected: no answers");
                session.projector.show_message(VALIDATION_MESSAGE);
                return ActionOutcome::Invalid(VALIDATION_MESSAGE.to_string());
            }

            session.generation += 1;
            session.state.last_answers = answers.clone();
            session.state.cursor = None;
            session.state.submit_in_flight = true;
            session.projector.submit_started();
            session.sync_busy();
            session.generation
        };
        let _finally = ActionGuard {
            inner: self.inner.as_ref(),
            action: Action::Submit,
            generation,
        };

        info!("Submitting {} answers (generation {})", answers.len(), generation);
        let start_time = Instant::now();
        let result = self
            .service
            .recommend(&RecommendationRequest::first_page(answers))
            .await;

        let mut session = lock(&self.inner);
        if session.generation != generation {
            info!(
                "Discarding submit response for generation {} (current {})",
                generation, session.generation
            );
            return ActionOutcome::Discarded;
        }

        let outcome = match result {
            Ok(response) => {
                info!(
                    "Submit returned {} charities in {:.2?} (more: {})",
                    response.charities.len(),
                    start_time.elapsed(),
                    response.cursor.is_some()
                );
                session.apply_first_page(response)
            }
            Err(err) => {
                error!("Submit failed: {}", err);
                // Nothing left for LoadMore to page through
                session.state.last_answers.clear();
                session.state.cursor = None;
                let message = err.user_message();
                session.projector.show_message(&message);
                ActionOutcome::Failed(message)
            }
        };
        drop(session);
        outcome
    }

    /// Fetch the next page for the current answers and append it.
    ///
    /// No-op unless a cursor is held and no other LoadMore is in flight.
    pub async fn load_more(&self) -> ActionOutcome {
        let (generation, request) = {
            let mut session = lock(&self.inner);
            if session.state.load_more_in_flight {
                debug!("Load more skipped: already in flight");
                return ActionOutcome::Skipped;
            }
            let Some(cursor) = session.state.cursor.clone() else {
                debug!("Load more skipped: no further results");
                return ActionOutcome::Skipped;
            };

            session.state.load_more_in_flight = true;
            session.projector.load_more_started();
            session.sync_busy();
            let request = RecommendationRequest::next_page(session.state.last_answers.clone(), cursor);
            (session.generation, request)
        };
        let _finally = ActionGuard {
            inner: self.inner.as_ref(),
            action: Action::LoadMore,
            generation,
        };

        info!("Loading more results (generation {})", generation);
        let result = self.service.recommend(&request).await;

        let mut session = lock(&self.inner);
        if session.generation != generation {
            info!(
                "Discarding load-more response for generation {} (current {})",
                generation, session.generation
            );
            return ActionOutcome::Discarded;
        }

        let outcome = match result {
            Ok(response) => {
                debug!("Load more returned {} charities", response.charities.len());
                session.apply_next_page(response)
            }
            Err(err) => {
                // Cursor stays put so the user can retry
                error!("Load more failed: {}", err);
                let message = err.user_message();
                session.projector.show_message(&message);
                ActionOutcome::Failed(message)
            }
        };
        drop(session);
        outcome
    }

    /// Load the daily picks section. Never touches survey state.
    pub async fn load_daily_picks(&self, limit: u32) -> ActionOutcome {
        lock(&self.inner).projector.picks_started();

        let result = self.service.daily_picks(limit).await;

        let mut session = lock(&self.inner);
        match result {
            Ok(charities) => {
                let cards: Vec<CharityCard> = charities.iter().map(render_charity).collect();
                let added = cards.len();
                info!("Loaded {} daily picks", added);
                session.projector.picks_loaded(cards);
                ActionOutcome::Rendered {
                    added,
                    total: added,
                    has_more: false,
                }
            }
            Err(err) => {
                error!("Daily picks failed: {}", err);
                let message = err.user_message();
                session.projector.picks_failed(&message);
                ActionOutcome::Failed(message)
            }
        }
    }
}
