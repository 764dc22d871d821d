//! Page model: everything the accessible interface shows.
//!
//! A DOM binding mirrors this one-to-one (ARIA busy flags, the live region,
//! control labels, the results heading and focus); the terminal host prints it.

use survey_model::REQUIRED_QUESTIONS;

use crate::render::CharityCard;

/// Element that should hold keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    ResultsHeading,
}

/// Live-announcing region used for errors and the empty state.
///
/// An empty message hides the region and clears the announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveRegion {
    message: String,
    visible: bool,
}

impl LiveRegion {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set(&mut self, message: &str) {
        self.message = message.to_string();
        self.visible = !message.is_empty();
    }
}

/// A button whose label is swapped while its action is in flight.
///
/// The original label is captured once at construction and restored
/// verbatim; it is never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    label: String,
    original_label: String,
    disabled: bool,
    visible: bool,
}

impl ControlState {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            original_label: label.clone(),
            label,
            disabled: false,
            visible: true,
        }
    }

    pub fn hidden(label: impl Into<String>) -> Self {
        Self {
            visible: false,
            ..Self::new(label)
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn original_label(&self) -> &str {
        &self.original_label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn begin_busy(&mut self, busy_label: &str) {
        self.disabled = true;
        self.label = busy_label.to_string();
    }

    pub(crate) fn restore(&mut self) {
        self.disabled = false;
        self.label = self.original_label.clone();
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// The non-survey "daily picks" section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PicksSection {
    pub busy: bool,
    pub cards: Vec<CharityCard>,
    pub message: Option<String>,
}

/// Snapshot of the whole interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    /// `aria-busy` on the survey form
    pub form_busy: bool,
    /// `aria-busy` on the results container
    pub results_busy: bool,
    pub live_region: LiveRegion,
    pub submit_control: ControlState,
    pub load_more_control: ControlState,
    pub heading: Option<String>,
    pub focus: Option<FocusTarget>,
    pub cards: Vec<CharityCard>,
    pub rationale: Vec<String>,
    pub answered_required: usize,
    pub required_total: usize,
    pub picks: PicksSection,
}

impl Default for PageModel {
    fn default() -> Self {
        Self {
            form_busy: false,
            results_busy: false,
            live_region: LiveRegion::default(),
            submit_control: ControlState::new("Get recommendations"),
            load_more_control: ControlState::hidden("Load more"),
            heading: None,
            focus: None,
            cards: Vec::new(),
            rationale: Vec::new(),
            answered_required: 0,
            required_total: REQUIRED_QUESTIONS.len(),
            picks: PicksSection::default(),
        }
    }
}
