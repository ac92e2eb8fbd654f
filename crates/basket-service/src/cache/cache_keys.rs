//! Cache key generators for consistent key naming.

/// Default namespace for cart entries.
pub const DEFAULT_CART_PREFIX: &str = "basket:cart";

/// Generate the cache key for a user's cart.
///
/// Usernames are case-sensitive store keys and are used as given.
#[must_use]
pub fn cart(prefix: &str, username: &str) -> String {
    format!("{prefix}:{username}")
}
