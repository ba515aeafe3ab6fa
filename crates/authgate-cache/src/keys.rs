//! Key builders for every entry AuthGate writes.

/// Default prefix of session keys.
pub const SESSION_PREFIX: &str = "session:";

/// Key of a session entry: `<prefix><session id>`.
pub fn session(prefix: &str, session_id: &str) -> String {
    format!("{prefix}{session_id}")
}
