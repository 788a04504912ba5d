//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_session, parse_reference_date, print_json)
//! - `reports` - Report commands (summary, categories, merchants, trends, budget, ...)
//! - `tools` - Tool boundary commands (list, call)

pub mod core;
pub mod reports;
pub mod tools;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use tools::*;

/// Truncate a string to a maximum length in characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
