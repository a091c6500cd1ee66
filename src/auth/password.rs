use tracing::error;

/// Fixed bcrypt work factor. Chosen to resist offline brute force while
/// keeping hashing latency bounded.
const BCRYPT_COST: u32 = 10;

/// Hash a password or transaction PIN. Callers must never log or persist the
/// plaintext.
pub fn hash_secret(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Compare a candidate secret against a stored digest. A mismatch is
/// `Ok(false)`, never an error; only a malformed digest errors.
pub fn verify_secret(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
}
