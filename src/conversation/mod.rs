//! Conversation state: per-session morning preferences and message log.

pub mod routes;
pub mod state;
pub mod store;

pub use routes::{SessionRouteState, session_routes};
pub use state::{ConversationState, IntakeStage, Message, MessageRole, split_preferences};
pub use store::{SessionHandle, SessionStore};
