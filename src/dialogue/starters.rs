//! Session-start greeting and the preset starter prompts.

use serde::Serialize;

pub const GREETING: &str = "Hello! I'm your morning routine assistant powered by Gemini AI. I can help you create a morning routine, search for videos, and find helpful articles. How can I help you today?";

/// A labeled shortcut that pre-fills a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Starter {
    pub label: &'static str,
    pub message: &'static str,
}

pub const STARTERS: [Starter; 3] = [
    Starter {
        label: "Morning routine ideation",
        message: "Can you help me create a personalized morning routine that would help increase my productivity throughout the day? Start by asking me about my current habits and what activities energize me in the morning.",
    },
    Starter {
        label: "Search YouTube",
        message: "Find me a motivational morning routine video on YouTube.",
    },
    Starter {
        label: "Search Web",
        message: "Find me some morning routine tips and articles.",
    },
];

/// Look up a starter by its 1-based position.
pub fn starter(index: usize) -> Option<&'static Starter> {
    index.checked_sub(1).and_then(|i| STARTERS.get(i))
}

/// What a channel shows when a session begins.
#[derive(Debug, Clone, Serialize)]
pub struct Welcome {
    pub greeting: String,
    pub starters: Vec<Starter>,
}

impl Default for Welcome {
    fn default() -> Self {
        Self {
            greeting: GREETING.to_string(),
            starters: STARTERS.to_vec(),
        }
    }
}

impl Welcome {
    /// Plain-text rendering: greeting followed by a numbered starter list.
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n", self.greeting);
        if !self.starters.is_empty() {
            out.push('\n');
            out.push_str(&self.render_starters());
        }
        out
    }

    /// The numbered starter list on its own.
    pub fn render_starters(&self) -> String {
        let mut out = String::from("Try one of these (type /starter N):\n");
        for (i, s) in self.starters.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, s.label));
        }
        out
    }
}
