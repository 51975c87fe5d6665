pub const MIN_PASSWORD_LEN: usize = 6;

/// Costo bcrypt usato per i nuovi hash.
pub const HASH_COST: u32 = 10;

/// Hash bcrypt della password (salt incluso nella stringa).
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, stored)
}
