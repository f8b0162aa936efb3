//! Agent module: the chat loop and slash-command parsing.

mod agent_loop;
pub mod submission;

pub use agent_loop::Agent;
pub use submission::{Submission, SubmissionParser};
