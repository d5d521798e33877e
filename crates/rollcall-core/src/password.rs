//! Password hashing, verification and policy checks.
//!
//! [`SecretHasher`] wraps bcrypt with a cost factor fixed at construction.
//! bcrypt salts every hash, so hashing the same plaintext twice yields two
//! different digests that both verify.
//!
//! bcrypt is CPU-bound; request handlers should use the `*_blocking`
//! variants, which move the work onto tokio's blocking pool.

use crate::errors::AppError;

/// Default bcrypt cost factor.
pub const DEFAULT_HASH_COST: u32 = 10;

/// bcrypt ignores input past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretHasher {
    cost: u32,
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_HASH_COST,
        }
    }
}

impl SecretHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
    }

    /// Returns `Ok(false)` on mismatch. Only a corrupt digest is an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, AppError> {
        bcrypt::verify(plaintext, digest).map_err(|e| {
            AppError::internal_error(format!("Stored password hash is unusable: {}", e))
        })
    }

    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(AppError::internal)?
    }

    pub async fn verify_blocking(
        &self,
        plaintext: String,
        digest: String,
    ) -> Result<bool, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(AppError::internal)?
    }
}

/// Every rule `password` breaks. An empty list means the password is accepted.
pub fn password_policy_violations(password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        violations.push(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    if !password.chars().any(char::is_alphabetic) {
        violations.push("password must contain a letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("password must contain a digit".to_string());
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the suite fast.
    fn hasher() -> SecretHasher {
        SecretHasher::new(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = hasher();
        let digest = hasher.hash("correct horse 1").unwrap();

        assert_ne!(digest, "correct horse 1");
        assert!(hasher.verify("correct horse 1", &digest).unwrap());
    }

    #[test]
    fn test_verify_wrong_password_is_false_not_error() {
        let hasher = hasher();
        let digest = hasher.hash("password123").unwrap();

        assert!(!hasher.verify("password124", &digest).unwrap());
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let hasher = hasher();
        let first = hasher.hash("samepassword1").unwrap();
        let second = hasher.hash("samepassword1").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("samepassword1", &first).unwrap());
        assert!(hasher.verify("samepassword1", &second).unwrap());
    }

    #[test]
    fn test_verify_corrupt_digest_is_error() {
        let result = hasher().verify("password123", "not_a_valid_bcrypt_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_cost_is_embedded_in_digest() {
        let digest = SecretHasher::new(5).hash("password123").unwrap();
        assert!(digest.starts_with("$2b$05$"));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(SecretHasher::default().cost(), 10);
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = hasher();
        let digest = hasher.hash_blocking("password123".to_string()).await.unwrap();

        assert!(
            hasher
                .verify_blocking("password123".to_string(), digest)
                .await
                .unwrap()
        );
    }

    #[test]
    fn test_policy_accepts_valid_password() {
        assert!(password_policy_violations("password123").is_empty());
    }

    #[test]
    fn test_policy_reports_every_violation() {
        let violations = password_policy_violations("abc");
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.contains("at least 8")));
        assert!(violations.iter().any(|v| v.contains("digit")));
    }

    #[test]
    fn test_policy_rejects_digits_only() {
        let violations = password_policy_violations("1234567890");
        assert_eq!(violations, vec!["password must contain a letter".to_string()]);
    }

    #[test]
    fn test_policy_rejects_overlong_password() {
        let long = format!("a1{}", "x".repeat(80));
        let violations = password_policy_violations(&long);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("72 bytes"));
    }
}
