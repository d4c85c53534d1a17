//! Password hashing.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::{AuthError, AuthResult};

/// Derives Argon2id password hashes with a fixed cost.
///
/// Every call draws a fresh random salt, so hashing the same password twice
/// yields different strings. The output is a self-describing PHC string that
/// embeds the salt and cost, which is all [`verify_password`] needs.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    /// Creates a hasher with the library's recommended cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hasher with explicit costs.
    ///
    /// * `m_cost` - memory size in KiB
    /// * `t_cost` - number of iterations
    /// * `p_cost` - degree of parallelism
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> AuthResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    /// Hashes a plaintext password.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let hash = argon2.hash_password(password.as_bytes(), &salt)?;

        tracing::trace!(
            m_cost = self.params.m_cost(),
            t_cost = self.params.t_cost(),
            "Derived password hash"
        );
        Ok(hash.to_string())
    }
}

/// Checks `candidate` against a stored hash.
///
/// Returns false on mismatch and on a hash that cannot be parsed.
pub fn verify_password(hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::debug!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
