//! Password hashing

use crate::error::Result;

/// bcrypt hasher with a cost factor fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted one-way hash
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// True iff `plaintext` matches `digest`. A malformed digest is an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        Ok(bcrypt::verify(plaintext, digest)?)
    }

    /// `hash` on the blocking pool, so the cost factor does not stall request threads
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    /// `verify` on the blocking pool
    pub async fn verify_blocking(&self, plaintext: String, digest: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest)).await?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        let digest = hasher.hash("hunter22").expect("Failed to hash");

        assert_ne!(digest, "hunter22");
        assert!(hasher.verify("hunter22", &digest).unwrap());
        assert!(!hasher.verify("hunter23", &digest).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new(TEST_COST);
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_digest() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(hasher.verify("anything", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn test_invalid_cost_fails() {
        let hasher = PasswordHasher::new(2);
        assert!(hasher.hash("password").is_err());
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = PasswordHasher::new(TEST_COST);
        let digest = hasher.hash_blocking("hunter22".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking("hunter22".to_string(), digest)
            .await
            .unwrap());
    }
}
