//! Constant-time comparison for credential checks
//!
//! A mismatch takes the same time wherever the first differing byte sits.
//! Only a length difference returns early.

/// Compares two strings without short-circuiting on content
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
