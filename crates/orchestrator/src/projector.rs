//! Accessibility projector.
//!
//! Maps orchestrator events onto the page model: busy flags while calls are
//! in flight, the live region, control label swaps, the results heading and
//! focus, and the answered-required counter.

use survey_model::FormState;

use crate::page::{FocusTarget, PageModel};
use crate::render::CharityCard;

pub const VALIDATION_MESSAGE: &str = "Please answer the required questions before submitting.";
pub const EMPTY_STATE_MESSAGE: &str = "No matching organizations yet. Try broadening your answers.";
pub const NO_PICKS_MESSAGE: &str = "No picks available today.";
pub const SUBMIT_BUSY_LABEL: &str = "Finding matches…";
pub const LOAD_MORE_BUSY_LABEL: &str = "Loading…";

/// Heading text for a given number of displayed results
pub fn results_heading(count: usize) -> String {
    if count == 1 {
        "Showing 1 recommendation".to_string()
    } else {
        format!("Showing {} recommendations", count)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessibilityProjector {
    page: PageModel,
}

impl AccessibilityProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &PageModel {
        &self.page
    }

    /// Recount answered required questions on every input/change event
    pub fn form_changed(&mut self, form: &FormState) {
        self.page.answered_required = form.answered_required();
    }

    pub fn show_message(&mut self, message: &str) {
        self.page.live_region.set(message);
    }

    pub fn clear_message(&mut self) {
        self.page.live_region.set("");
    }

    /// Recompute `aria-busy` from the in-flight flags
    pub fn sync_busy(&mut self, submit_in_flight: bool, load_more_in_flight: bool) {
        self.page.form_busy = submit_in_flight;
        self.page.results_busy = submit_in_flight || load_more_in_flight;
    }

    // ---------------------------------------------------------------------
    // Submit channel
    // ---------------------------------------------------------------------

    /// Clear the error, clear prior results, hide pagination, busy label
    pub fn submit_started(&mut self) {
        self.clear_message();
        self.page.cards.clear();
        self.page.rationale.clear();
        self.page.heading = None;
        self.page.focus = None;
        self.page.load_more_control.set_visible(false);
        self.page.submit_control.begin_busy(SUBMIT_BUSY_LABEL);
    }

    pub fn submit_finished(&mut self) {
        self.page.submit_control.restore();
    }

    pub fn replace_results(&mut self, cards: Vec<CharityCard>, rationale: Vec<String>) {
        self.page.cards = cards;
        self.page.rationale = rationale;
        if self.page.cards.is_empty() {
            self.show_message(EMPTY_STATE_MESSAGE);
        }
        self.announce_results();
    }

    // ---------------------------------------------------------------------
    // Load-more channel
    // ---------------------------------------------------------------------

    pub fn load_more_started(&mut self) {
        self.clear_message();
        self.page.load_more_control.begin_busy(LOAD_MORE_BUSY_LABEL);
    }

    pub fn load_more_finished(&mut self) {
        self.page.load_more_control.restore();
    }

    /// Append a page; an empty page leaves the displayed cards alone
    pub fn append_results(&mut self, cards: Vec<CharityCard>, rationale: Vec<String>) {
        if !cards.is_empty() {
            self.page.cards.extend(cards);
            if !rationale.is_empty() {
                self.page.rationale = rationale;
            }
        }
        self.announce_results();
    }

    pub fn set_load_more_visible(&mut self, visible: bool) {
        self.page.load_more_control.set_visible(visible);
    }

    fn announce_results(&mut self) {
        self.page.heading = Some(results_heading(self.page.cards.len()));
        self.page.focus = Some(FocusTarget::ResultsHeading);
    }

    // ---------------------------------------------------------------------
    // Daily picks
    // ---------------------------------------------------------------------

    pub fn picks_started(&mut self) {
        self.page.picks.busy = true;
        self.page.picks.message = None;
    }

    pub fn picks_loaded(&mut self, cards: Vec<CharityCard>) {
        self.page.picks.busy = false;
        self.page.picks.message = cards.is_empty().then(|| NO_PICKS_MESSAGE.to_string());
        self.page.picks.cards = cards;
    }

    pub fn picks_failed(&mut self, message: &str) {
        self.page.picks.busy = false;
        self.page.picks.message = Some(message.to_string());
    }
}
