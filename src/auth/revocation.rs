use moka::future::Cache;
use std::time::Duration;

/// Refresh token ids that may no longer be exchanged.
///
/// Entries expire together with the tokens they block, so the set stays
/// bounded by the number of refreshes within one token lifetime.
#[derive(Clone)]
pub struct RevokedTokens {
    cache: Cache<String, ()>,
}

impl RevokedTokens {
    pub fn new(refresh_token_ttl: usize) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(500_000) // tune based on memory
                .time_to_live(Duration::from_secs(refresh_token_ttl as u64))
                .build(),
        }
    }

    /// Mark a refresh token id as spent.
    ///
    /// Returns `true` only for the caller that actually spent it; the
    /// lookup and the insert are a single cache entry operation.
    pub async fn revoke(&self, jti: &str) -> bool {
        self.cache
            .entry(jti.to_string())
            .or_insert(())
            .await
            .is_fresh()
    }

    #[cfg(test)]
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.cache.contains_key(jti)
    }
}
