//! Gap-fill grammar quizzes: pick words from an English passage, hide
//! them, and score the user's attempt to put them back.

pub mod commands;
pub mod gap_text;
pub mod grade;
pub mod llm;
pub mod palette;
pub mod passage;
pub mod select;
pub mod session;
pub mod telemetry;
pub mod tui;
pub mod utils;
