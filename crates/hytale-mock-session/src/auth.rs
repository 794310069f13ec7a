//! Placeholder authentication.
//!
//! The mock does not verify credentials. "Authenticating" a username only
//! means normalizing it and handing back an opaque token that nothing
//! ever checks. Tokens do not expire and are not stored.

use rand::Rng;

/// Prefix every issued token carries, so it is obvious in logs and
/// client code that it came from the mock.
const TOKEN_PREFIX: &str = "mock-token-";

/// The result of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    /// An opaque, unpredictable token (`mock-token-` + 32 hex chars).
    pub token: String,
    /// The username after normalization.
    pub username: String,
}

/// Generates a token with 128 bits of randomness.
///
/// Each byte is formatted as two lowercase hex characters (`{:02x}`),
/// so 16 random bytes become 32 characters after the prefix.
pub(crate) fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{TOKEN_PREFIX}{hex}")
}
