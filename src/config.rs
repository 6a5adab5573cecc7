use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::auth::{JwtKeys, PasswordHasher, DEFAULT_ITERATIONS};
use crate::db::connection::is_memory_url;
use crate::domain::users::AdminSeed;

/// Signing key used outside production when no secret is configured
const DEV_SECRET: &str = "hbnb-dev-secret-change-me";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_DATABASE_URL: &str = "sqlite://hbnb.db";
const DEFAULT_TOKEN_TTL: &str = "3600";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("{0} must be set in production")]
    MissingSecret(&'static str),

    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    PartialAdminSeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(Self::Memory),
            "sqlite" | "sql" | "database" => Ok(Self::Sqlite),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub password_hash_iterations: u32,
    pub admin_seed: Option<AdminSeed>,
}

impl Config {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment: Environment = parse(&var, "HBNB_ENV", "development")?;

        let database_url = var("DATABASE_URL");
        let storage = match var("HBNB_STORAGE") {
            Some(value) => parse_value("HBNB_STORAGE", &value)?,
            None if database_url.is_some() => StorageBackend::Sqlite,
            None => StorageBackend::Memory,
        };

        let jwt_secret = match var("JWT_SECRET").or_else(|| var("SECRET_KEY")) {
            Some(secret) => secret,
            None if environment == Environment::Production => {
                return Err(ConfigError::MissingSecret("JWT_SECRET"));
            }
            None => {
                warn!("JWT_SECRET not set, using development secret");
                DEV_SECRET.to_string()
            }
        };

        let jwt_ttl_seconds: i64 = parse(&var, "JWT_ACCESS_TOKEN_EXPIRES", DEFAULT_TOKEN_TTL)?;
        if jwt_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_ACCESS_TOKEN_EXPIRES".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let password_hash_iterations: u32 = parse(
            &var,
            "PASSWORD_HASH_ITERATIONS",
            &DEFAULT_ITERATIONS.to_string(),
        )?;

        let admin_seed = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed::new(email, password)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialAdminSeed),
        };

        Ok(Self {
            environment,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse(&var, "PORT", DEFAULT_PORT)?,
            storage,
            database_url: database_url.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_ttl_seconds,
            password_hash_iterations,
            admin_seed,
        })
    }

    /// Whether data written through this configuration outlives the process
    pub fn is_persistent(&self) -> bool {
        self.storage == StorageBackend::Sqlite && !is_memory_url(&self.database_url)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn password_hasher(&self) -> Result<PasswordHasher, ConfigError> {
        PasswordHasher::new(self.password_hash_iterations).map_err(|e| ConfigError::Invalid {
            key: "PASSWORD_HASH_ITERATIONS".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn jwt_keys(&self) -> JwtKeys {
        JwtKeys::new(&self.jwt_secret, self.jwt_ttl_seconds)
    }
}

fn parse<T, V>(var: &V, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    V: Fn(&str) -> Option<String>,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &value)
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
