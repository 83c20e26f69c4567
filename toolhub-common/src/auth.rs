//! Password hashing and access token helpers
//!
//! Pure functions only; the database side lives in [`crate::db::users`] and
//! the HTTP side in the service's auth middleware.
//!
//! - Passwords are stored as an iterated, salted SHA-256 digest
//!   (`password_hash`, `password_salt` columns).
//! - Access tokens are 32 random bytes, hex encoded, handed to the client
//!   once. Only their SHA-256 digest is stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// SHA-256 iterations applied to salted passwords
pub const PASSWORD_HASH_ROUNDS: u32 = 10_000;

/// Random bytes in a salt
const SALT_BYTES: usize = 16;

/// Random bytes in an access token
const TOKEN_BYTES: usize = 32;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// Generate a fresh password salt (32 hex chars)
pub fn generate_salt() -> String {
    random_hex(SALT_BYTES)
}

/// Hash `password` with `salt`
///
/// # Examples
///
/// ```
/// use toolhub_common::auth::{hash_password, verify_password};
///
/// let hash = hash_password("s3cret", "abcd");
/// assert_eq!(hash.len(), 64);
/// assert!(verify_password("s3cret", "abcd", &hash));
/// assert!(!verify_password("wrong", "abcd", &hash));
/// ```
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();

    for _ in 1..PASSWORD_HASH_ROUNDS {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt.as_bytes())
            .finalize();
    }

    format!("{:x}", digest)
}

/// Check `password` against a stored hash
///
/// An empty stored hash never matches (accounts without a password cannot log in).
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    if expected_hash.is_empty() {
        return false;
    }
    constant_time_eq(hash_password(password, salt).as_bytes(), expected_hash.as_bytes())
}

/// Generate a new opaque access token (64 hex chars)
pub fn generate_token() -> String {
    random_hex(TOKEN_BYTES)
}

/// Digest under which a token is stored
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_per_salt() {
        let a = hash_password("hunter2", "salt-a");
        let b = hash_password("hunter2", "salt-a");
        let c = hash_password("hunter2", "salt-b");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_password() {
        let salt = generate_salt();
        let hash = hash_password("correct horse", &salt);

        assert!(verify_password("correct horse", &salt, &hash));
        assert!(!verify_password("correct horse ", &salt, &hash));
        assert!(!verify_password("", &salt, ""));
    }

    #[test]
    fn test_generated_values_are_unique_hex() {
        let s1 = generate_salt();
        let s2 = generate_salt();
        assert_eq!(s1.len(), 32);
        assert_ne!(s1, s2);

        let t1 = generate_token();
        let t2 = generate_token();
        assert_eq!(t1.len(), 64);
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_token_hash() {
        let token = "abc";
        assert_eq!(
            hash_token(token),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("bearer   abc123 "), Some("abc123"));
        assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer"), None);
    }
}
