// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Session identifier generation.
Identifiers are the whole authentication secret, so they come from a
cryptographically secure generator and carry a namespace prefix. */
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/** Generate a namespaced, unguessable identifier
# Returns
`<prefix>-<base64url random bytes>` */
pub fn generate_unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", generate_secure_token())
}

/// Generate a URL-safe random token without padding
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a random token with the given number of bytes of entropy
# Arguments
* `bytes` - The size of the random token in bytes */
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
