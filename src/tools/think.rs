//! Reflective note-taking capability.
//!
//! The reflection is echoed back as the tool observation so it lands in the
//! conversation and stays visible to the model's later decisions. It carries
//! no other side effect.

/// Record a reflection and return the observation text.
pub fn record_reflection(reflection: &str) -> String {
    tracing::debug!(chars = reflection.len(), "reflection recorded");
    format!("Reflection recorded: {}", reflection)
}
