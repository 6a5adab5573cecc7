use base64::{engine::general_purpose, Engine as _};
use constant_time_eq::constant_time_eq;
use pbkdf2::hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use tracing::warn;

/// Django 4.0+ default
pub const DEFAULT_ITERATIONS: u32 = 600_000;

const ALGORITHM: &str = "pbkdf2_sha256";
const HASH_LEN: usize = 32; // SHA256 produces 32 bytes

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Iteration count must be positive")]
    InvalidIterations,

    #[error("Key derivation failed: {0}")]
    Derivation(String),
}

/// Hashes passwords in Django's format: `pbkdf2_sha256$iterations$salt$hash`
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Result<Self, PasswordError> {
        if iterations == 0 {
            return Err(PasswordError::InvalidIterations);
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        self.hash_with_salt(password, &salt)
    }

    fn hash_with_salt(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let encoded = derive(password, salt, self.iterations)?;
        Ok(format!(
            "{}${}${}${}",
            ALGORITHM, self.iterations, salt, encoded
        ))
    }
}

fn derive(password: &str, salt: &str, iterations: u32) -> Result<String, PasswordError> {
    let mut output = [0u8; HASH_LEN];
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt.as_bytes(), iterations, &mut output)
        .map_err(|e| PasswordError::Derivation(e.to_string()))?;
    Ok(general_purpose::STANDARD.encode(output))
}

/// Verify a password against a stored hash. Iterations come from the hash
/// itself, so changing the configured count never locks anyone out.
pub fn verify_password(password: &str, hash_string: &str) -> bool {
    let parts: Vec<&str> = hash_string.split('$').collect();
    if parts.len() != 4 || parts[0] != ALGORITHM {
        warn!("Unknown password hash format");
        return false;
    }

    let iterations: u32 = match parts[1].parse() {
        Ok(i) if i > 0 => i,
        _ => return false,
    };
    let salt = parts[2];
    let expected_hash = parts[3];

    match derive(password, salt, iterations) {
        Ok(computed) => constant_time_eq(computed.as_bytes(), expected_hash.as_bytes()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(1_000).unwrap()
    }

    #[test]
    fn test_hash_format() {
        let hash = fast_hasher().hash("correct horse").unwrap();
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "pbkdf2_sha256");
        assert_eq!(parts[1], "1000");
        assert!(!parts[2].is_empty());
    }

    #[test]
    fn test_verify_round_trip() {
        let hash = fast_hasher().hash("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = fast_hasher();
        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_fixed_salt_is_deterministic() {
        let hash = fast_hasher().hash_with_salt("password", "testsalt").unwrap();
        assert!(verify_password("password", &hash));
        assert!(hash.starts_with("pbkdf2_sha256$1000$testsalt$"));
        assert_eq!(
            hash,
            fast_hasher().hash_with_salt("password", "testsalt").unwrap()
        );
    }

    #[test]
    fn test_rejects_unknown_formats() {
        assert!(!verify_password("password", "sha256$abcdef"));
        assert!(!verify_password("password", "pbkdf2_sha256$notanumber$salt$hash"));
        assert!(!verify_password("password", "pbkdf2_sha256$0$salt$hash"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(
            PasswordHasher::new(0),
            Err(PasswordError::InvalidIterations)
        ));
    }
}
