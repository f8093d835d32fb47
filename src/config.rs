use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result, anyhow, bail};
use argon2::password_hash::PasswordHash;
use dotenvy::dotenv;

/// Upper bound for token lifetimes: ten years.
const MAX_TOKEN_TTL: usize = 10 * 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Upstream roster endpoint
    pub roster_url: String,
    pub roster_username: String,
    pub roster_password: String,
    pub roster_timeout_secs: u64,

    // Directory login
    pub directory_username: String,
    pub directory_password_hash: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub log_level: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            api_prefix: var_or("API_PREFIX", "/api"),

            roster_url: required("ROSTER_URL")?,
            roster_username: required("ROSTER_USERNAME")?,
            roster_password: required("ROSTER_PASSWORD")?,
            roster_timeout_secs: parsed("ROSTER_TIMEOUT_SECS", "15")?,

            directory_username: required("DIRECTORY_USERNAME")?,
            directory_password_hash: password_hash("DIRECTORY_PASSWORD_HASH")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: token_ttl("ACCESS_TOKEN_TTL", "900")?, // default 15 min
            refresh_token_ttl: token_ttl("REFRESH_TOKEN_TTL", "604800")?, // default 7 days

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", "60")?,
            rate_refresh_per_min: parsed("RATE_REFRESH_PER_MIN", "30")?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            log_level: var_or("LOG_LEVEL", "debug"),
            log_dir: var_or("LOG_DIR", "logs"),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    parse_value(key, &var_or(key, default))
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}"))
}

fn token_ttl(key: &str, default: &str) -> Result<usize> {
    check_ttl(key, parsed(key, default)?)
}

fn check_ttl(key: &str, ttl: usize) -> Result<usize> {
    if !(1..=MAX_TOKEN_TTL).contains(&ttl) {
        bail!("{key} must be between 1 and {MAX_TOKEN_TTL} seconds, got {ttl}");
    }
    Ok(ttl)
}

/// An argon2 PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`
fn password_hash(key: &str) -> Result<String> {
    check_password_hash(key, required(key)?)
}

fn check_password_hash(key: &str, raw: String) -> Result<String> {
    PasswordHash::new(&raw).map_err(|e| anyhow!("invalid {key}: {e}"))?;
    Ok(raw)
}

#[cfg(test)]
impl Config {
    /// Settings for handler tests; nothing here touches the environment.
    pub fn for_tests(roster_url: &str) -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            api_prefix: "/api".to_string(),
            roster_url: roster_url.to_string(),
            roster_username: "test".to_string(),
            roster_password: "123456".to_string(),
            roster_timeout_secs: 5,
            directory_username: "admin".to_string(),
            directory_password_hash: crate::auth::password::hash_password("s3cret")
                .expect("hash test password"),
            jwt_secret: "test-secret".to_string(),
            access_token_ttl: 900,
            refresh_token_ttl: 3600,
            rate_login_per_min: 1000,
            rate_refresh_per_min: 1000,
            rate_protected_per_min: 1000,
            log_level: "debug".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}
