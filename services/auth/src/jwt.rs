//! JWT service for token generation and validation
//!
//! Tokens are signed either with a shared secret (HS256) or with an RSA key
//! pair (RS256), depending on which environment variables are present. A token
//! signed with any other key or algorithm fails validation.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use uuid::Uuid;

/// Default token lifetime: 30 days
pub const DEFAULT_TOKEN_EXPIRY: u64 = 30 * 24 * 60 * 60;

/// Longest accepted token lifetime: 10 years
pub const MAX_TOKEN_EXPIRY: u64 = 10 * 365 * 24 * 60 * 60;

/// Key material used to sign and verify tokens
#[derive(Debug, Clone)]
pub enum JwtKeys {
    /// HS256 shared secret
    Secret(String),
    /// RS256 key pair in PEM format
    Rsa {
        private_key: String,
        public_key: String,
    },
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing keys
    pub keys: JwtKeys,
    /// Token expiration time in seconds (default: 30 days)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HS256 secret; takes precedence over the RSA keys
    /// - `JWT_PRIVATE_KEY`: RS256 private key (PEM format) or path to the key file
    /// - `JWT_PUBLIC_KEY`: RS256 public key (PEM format) or path to the key file
    /// - `JWT_EXPIRY`: Token expiry in seconds (default: 2592000, at most
    ///   [`MAX_TOKEN_EXPIRY`])
    pub fn from_env() -> Result<Self> {
        let keys = match std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()) {
            Some(secret) => {
                if secret.len() < 32 {
                    warn!("JWT_SECRET is shorter than 32 bytes");
                }
                JwtKeys::Secret(secret)
            }
            None => JwtKeys::Rsa {
                private_key: read_key("JWT_PRIVATE_KEY")?,
                public_key: read_key("JWT_PUBLIC_KEY")?,
            },
        };

        let token_expiry = std::env::var("JWT_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);
        if token_expiry > MAX_TOKEN_EXPIRY {
            anyhow::bail!(
                "JWT_EXPIRY of {} seconds exceeds the maximum of {}",
                token_expiry,
                MAX_TOKEN_EXPIRY
            );
        }

        Ok(JwtConfig { keys, token_expiry })
    }

    /// HS256 configuration with the default expiry
    pub fn with_secret(secret: impl Into<String>) -> Self {
        JwtConfig {
            keys: JwtKeys::Secret(secret.into()),
            token_expiry: DEFAULT_TOKEN_EXPIRY,
        }
    }
}

/// Read a PEM key from an environment variable holding either the key itself
/// or a path to it
fn read_key(var: &str) -> Result<String> {
    let value = std::env::var(var).map_err(|_| {
        anyhow::anyhow!("{} environment variable not set (and JWT_SECRET is empty)", var)
    })?;

    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    let key = std::fs::read_to_string(&value)
        .map_err(|e| anyhow::anyhow!("Failed to read {} from {}: {}", var, value, e))?;
    Ok(key.trim().to_string())
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let (encoding_key, decoding_key, algorithm) = match &config.keys {
            JwtKeys::Secret(secret) => (
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
                Algorithm::HS256,
            ),
            JwtKeys::Rsa {
                private_key,
                public_key,
            } => (
                EncodingKey::from_rsa_pem(private_key.as_bytes())?,
                DecodingKey::from_rsa_pem(public_key.as_bytes())?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;

        info!("JWT service initialized with {:?}", algorithm);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            algorithm,
            validation,
            token_expiry: config.token_expiry,
        })
    }

    /// Generate a bearer token for a user
    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let exp = now.checked_add(self.token_expiry).ok_or_else(|| {
            anyhow::anyhow!("Token expiry of {}s is out of range", self.token_expiry)
        })?;

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}
