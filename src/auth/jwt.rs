use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

fn issue(
    username: &str,
    token_type: TokenType,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = Claims {
        sub: username.to_string(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn generate_access_token(username: &str, secret: &str, ttl: usize) -> Result<String, Error> {
    issue(username, TokenType::Access, secret, ttl).map(|(token, _)| token)
}

pub fn generate_refresh_token(
    username: &str,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    issue(username, TokenType::Refresh, secret, ttl)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips() {
        let token = generate_access_token("admin", "secret", 60).unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn refresh_tokens_get_distinct_ids() {
        let (_, first) = generate_refresh_token("admin", "secret", 60).unwrap();
        let (_, second) = generate_refresh_token("admin", "secret", 60).unwrap();

        assert_eq!(first.token_type, TokenType::Refresh);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token("admin", "secret", 60).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }
}
