//! Identifier generation for members and tasks.
//!
//! Ids are random UUID v4 strings. They carry no ordering and are never used
//! for sorting; callers only compare them for equality or prefix matches.

use uuid::Uuid;

/// Number of characters shown when an id is abbreviated for display
pub const SHORT_ID_LEN: usize = 8;

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Abbreviated form of an id for human output
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
