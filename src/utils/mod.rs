//! Small shared utilities: date formatting for prompts and tracing setup.

/// Configuration loading (TOML + environment).
pub mod config;

use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Today's date formatted for prompt interpolation, e.g. "Mon Jan 12, 2026".
pub fn get_today_str() -> String {
    Local::now().format("%a %b %-d, %Y").to_string()
}

/// Initialize tracing for embedding applications.
///
/// Respects `RUST_LOG`; defaults to `scout=info` when unset. Calling this
/// twice is a no-op (the second `init` fails quietly).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scout=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_str_contains_year() {
        let today = get_today_str();
        let year = chrono::Local::now().format("%Y").to_string();
        assert!(today.contains(&year));
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
