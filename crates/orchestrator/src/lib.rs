//! Orchestrator crate for the charity survey client.
//!
//! This crate contains the page-session orchestrator that coordinates
//! submissions and pagination, the accessibility projector that keeps the
//! interface state in step with it, and the entity renderer.

pub mod orchestrator;
pub mod page;
pub mod projector;
pub mod render;

pub use orchestrator::{ActionOutcome, OrchestratorState, RecommendationOrchestrator};
pub use page::{ControlState, FocusTarget, LiveRegion, PageModel, PicksSection};
pub use projector::{
    results_heading, AccessibilityProjector, EMPTY_STATE_MESSAGE, LOAD_MORE_BUSY_LABEL,
    NO_PICKS_MESSAGE, SUBMIT_BUSY_LABEL, VALIDATION_MESSAGE,
};
pub use render::{render_charity, CharityCard, ExternalLink, LOCATION_FALLBACK};
