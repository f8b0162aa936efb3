//! Morning Assist: a chat assistant that helps plan a morning routine.

pub mod agent;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod dialogue;
pub mod error;
pub mod llm;
pub mod safety;
pub mod search;
