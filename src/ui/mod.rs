// src/ui/mod.rs

//! Everything the operator sees or answers during the pre-scan gate.
//!
//! The gate only talks to the [`Console`] and [`Prompt`] traits, so tests can
//! swap the terminal for a recording stub.

pub mod console;

pub use console::{StdinPrompt, TerminalConsole, is_interactive};

/// User-visible output events.
pub trait Console {
    fn banner(&mut self);

    /// An advisory, non-fatal message.
    fn notice(&mut self, message: &str);

    fn update_started(&mut self);

    /// `updated` lists the files that changed; it is only shown when verbose.
    fn update_finished(&mut self, updated: &[String], verbose: bool);

    /// The target still serves the install wizard at `url`.
    fn not_fully_configured(&mut self, url: &str);

    /// The gate passed and probing may start.
    fn ready(&mut self, summary: &str);

    /// A fatal error that aborts the run.
    fn aborted(&mut self, message: &str);
}

/// A yes/no question put to the operator.
pub trait Prompt {
    /// Asks `question` and returns the raw answer line.
    fn ask(&mut self, question: &str) -> std::io::Result<String>;
}

/// Parses a yes/no answer. Only answers starting with `y` (any case) are a yes;
/// anything else, including an empty line, takes the "no" default.
pub fn parse_yes(answer: &str) -> bool {
    answer
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}
