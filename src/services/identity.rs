//! Visitor identity derivation
//!
//! Turns a request's originating network address into a stable, one-way
//! per-visitor identifier using Argon2id with a fixed, configured salt.
//!
//! # Determinism
//!
//! The usual password-hashing pattern generates a fresh random salt per call,
//! which would give the same visitor a different identity on every request
//! and break like tracking entirely. The salt here is encoded once at
//! construction from the configured secret and reused verbatim for every
//! call: same address + same salt always yields the same identifier, and the
//! address cannot be recovered from it.

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

/// Error types for identity derivation
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The secret salt is missing from configuration. Startup must abort
    /// rather than fall back to hashing with a known or empty salt.
    #[error("identity.ip_salt is not configured (set it in config.yml or TALLY_IDENTITY_IP_SALT)")]
    MissingSalt,

    /// The configured salt cannot be used as an Argon2 salt
    #[error("Invalid identity salt: {0}")]
    InvalidSalt(String),

    /// Hashing failed
    #[error("Failed to derive visitor identity: {0}")]
    Hash(String),
}

/// Derives stable visitor identifiers from client addresses.
///
/// Constructed once at startup from the configured secret salt and shared
/// read-only across requests.
pub struct IdentityHasher {
    salt: SaltString,
}

impl IdentityHasher {
    /// Create a hasher from the configured secret salt.
    ///
    /// Fails when the salt is unset, empty, or not encodable as an Argon2
    /// salt, so a misconfigured deployment stops at startup instead of
    /// producing weak identities.
    pub fn new(salt: Option<&str>) -> Result<Self, IdentityError> {
        let secret = salt
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(IdentityError::MissingSalt)?;

        let salt = SaltString::encode_b64(secret.as_bytes())
            .map_err(|e| IdentityError::InvalidSalt(e.to_string()))?;

        Ok(Self { salt })
    }

    /// Derive the visitor identifier for a client address.
    ///
    /// Returns the PHC-format hash string; deterministic for a fixed salt.
    pub fn derive(&self, address: &str) -> Result<String, IdentityError> {
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(address.as_bytes(), &self.salt)
            .map_err(|e| IdentityError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hasher() -> IdentityHasher {
        IdentityHasher::new(Some("test-salt-value")).expect("Failed to build hasher")
    }

    #[test]
    fn test_missing_salt_is_rejected() {
        assert!(matches!(
            IdentityHasher::new(None),
            Err(IdentityError::MissingSalt)
        ));
    }

    #[test]
    fn test_empty_salt_is_rejected() {
        assert!(matches!(
            IdentityHasher::new(Some("")),
            Err(IdentityError::MissingSalt)
        ));
        assert!(matches!(
            IdentityHasher::new(Some("   ")),
            Err(IdentityError::MissingSalt)
        ));
    }

    #[test]
    fn test_same_address_yields_same_identity() {
        let hasher = test_hasher();
        let first = hasher.derive("203.0.113.7").expect("Derive failed");
        let second = hasher.derive("203.0.113.7").expect("Derive failed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_addresses_yield_different_identities() {
        let hasher = test_hasher();
        let a = hasher.derive("203.0.113.7").expect("Derive failed");
        let b = hasher.derive("203.0.113.8").expect("Derive failed");
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_salts_yield_different_identities() {
        let first = IdentityHasher::new(Some("salt-one"))
            .expect("Failed to build hasher")
            .derive("203.0.113.7")
            .expect("Derive failed");
        let second = IdentityHasher::new(Some("salt-two"))
            .expect("Failed to build hasher")
            .derive("203.0.113.7")
            .expect("Derive failed");
        assert_ne!(first, second);
    }

    #[test]
    fn test_identity_is_argon2id_hash() {
        let hasher = test_hasher();
        let id = hasher.derive("203.0.113.7").expect("Derive failed");
        assert!(id.starts_with("$argon2id$"));
        assert!(!id.contains("203.0.113.7"));
    }
}
