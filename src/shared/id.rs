//! Prefixed Document Identifiers
//!
//! All persisted documents carry a short string id of the form
//! `<prefix>_<12 hex chars>` (e.g. `user_3f2a9c1d04be`, `conv_...`).

use uuid::Uuid;

/// Number of hex characters kept from the generated UUID.
const ID_HEX_LEN: usize = 12;

/// Generate a new document id with the given entity prefix.
pub fn prefixed_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..ID_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_id_shape() {
        let id = prefixed_id("user");
        assert!(id.starts_with("user_"));
        assert_eq!(id.len(), "user_".len() + ID_HEX_LEN);
        assert!(id["user_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_prefixed_id_unique() {
        let a = prefixed_id("msg");
        let b = prefixed_id("msg");
        assert_ne!(a, b);
    }
}
