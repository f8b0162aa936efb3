//! Dialogue layer: intent classification, intake prompts, and rendering.
//!
//! Each incoming message is checked in a fixed order: video request, web
//! search request, routine kickoff, then whichever intake question is still
//! open (habits → energizing activities → goals), and finally free-form
//! chat with the model. Search requests take priority at every stage.

pub mod controller;
pub mod intent;
pub mod prompts;
pub mod render;
pub mod starters;

pub use controller::{DialogueController, ReplySink};
pub use intent::{Intent, classify};
pub use render::render_routine_summary;
pub use starters::{GREETING, STARTERS, Starter, Welcome};
