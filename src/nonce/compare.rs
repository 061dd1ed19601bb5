use subtle::ConstantTimeEq;

/// Timing-safe string equality.
///
/// Strings of different length compare unequal immediately, so the length of
/// the expected value can leak. For equal lengths every byte pair is folded
/// into the result without an early exit, so the position of the first
/// mismatch does not show in the timing.
///
/// ```rust
/// use action_nonce::constant_time_eq;
///
/// assert!(constant_time_eq("a1b2c3d4e5", "a1b2c3d4e5"));
/// assert!(!constant_time_eq("a1b2c3d4e5", "a1b2c3d4e6"));
/// assert!(!constant_time_eq("a1b2c3d4e5", "a1b2"));
/// ```
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
