// Password hashing and verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

/// Hash a password with Argon2id and a random salt.
///
/// Returns a PHC-format string suitable for storage. Stored credentials are
/// never plaintext; an empty stored string means "no password set"
/// (Google-first accounts).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash in constant time.
///
/// An empty or unparseable stored hash verifies as false, so accounts
/// without a password can never log in via the password path.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// A throwaway hash with the same parameters as real credentials.
///
/// Login verifies against this when no stored credential exists (unknown
/// email, or a Google-first account with no password), so a lookup miss
/// costs the same Argon2 work as a wrong password and response timing
/// cannot enumerate accounts. Callers must still reject regardless of the
/// verification outcome.
pub fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| {
        hash_password("equalize-timing").expect("hashing with default argon2 params cannot fail")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("secret1").expect("hashing failed");
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("secret1").expect("hashing failed");
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn test_empty_stored_hash_never_verifies() {
        // Google-first accounts store "" until set-password is called
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b, "same password should hash differently per salt");
    }

    #[test]
    fn test_dummy_hash_is_a_real_hash() {
        // If this ever stops parsing, the timing-equalizing verification
        // would silently short-circuit again
        assert!(PasswordHash::new(dummy_hash()).is_ok());
        assert!(!verify_password("anything", dummy_hash()));
        assert_eq!(dummy_hash(), dummy_hash(), "initialized once per process");
    }
}
