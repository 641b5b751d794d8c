//! Policy configuration for token issuance and session lifetimes.

use chrono::Duration;

/// Default issuer claim
pub const DEFAULT_ISSUER: &str = "sentra";

/// Default audience claim
pub const DEFAULT_AUDIENCE: &str = "sentra-api";

/// Lifetime and claim policy shared by the token issuer, the rotation
/// engine, and the key manager
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,

    /// How far a successful refresh slides the session expiry, in seconds
    pub session_sliding_window_secs: i64,

    /// Hard cap on total session lifetime from creation, in seconds
    pub max_session_age_secs: i64,

    /// How long a retired signing key remains valid for verification, in
    /// seconds. Must exceed both the access-token lifetime and any key
    /// cache TTL used by downstream verifiers.
    pub key_overlap_secs: i64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            access_token_ttl_secs: 15 * 60,
            refresh_token_ttl_secs: 7 * 24 * 60 * 60,
            session_sliding_window_secs: 7 * 24 * 60 * 60,
            max_session_age_secs: 30 * 24 * 60 * 60,
            key_overlap_secs: 60 * 60,
        }
    }
}

impl TokenPolicy {
    /// Creates policy from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            issuer: std::env::var("TOKEN_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("TOKEN_AUDIENCE").unwrap_or(defaults.audience),
            access_token_ttl_secs: env_i64("ACCESS_TOKEN_TTL", defaults.access_token_ttl_secs),
            refresh_token_ttl_secs: env_i64("REFRESH_TOKEN_TTL", defaults.refresh_token_ttl_secs),
            session_sliding_window_secs: env_i64(
                "SESSION_SLIDING_WINDOW",
                defaults.session_sliding_window_secs,
            ),
            max_session_age_secs: env_i64("MAX_SESSION_AGE", defaults.max_session_age_secs),
            key_overlap_secs: env_i64("KEY_OVERLAP_WINDOW", defaults.key_overlap_secs),
        }
    }

    /// Access token lifetime
    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_secs)
    }

    /// Refresh token lifetime
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::seconds(self.refresh_token_ttl_secs)
    }

    /// Sliding extension applied per refresh
    pub fn session_sliding_window(&self) -> Duration {
        Duration::seconds(self.session_sliding_window_secs)
    }

    /// Absolute session age cap
    pub fn max_session_age(&self) -> Duration {
        Duration::seconds(self.max_session_age_secs)
    }

    /// Retired-key verification window
    pub fn key_overlap_window(&self) -> Duration {
        Duration::seconds(self.key_overlap_secs)
    }

    /// Set the access token lifetime in minutes
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_secs = minutes * 60;
        self
    }

    /// Set the maximum session age in days
    pub fn with_max_session_age_days(mut self, days: i64) -> Self {
        self.max_session_age_secs = days * 24 * 60 * 60;
        self
    }

    /// Set the retired-key overlap window in seconds
    pub fn with_key_overlap_secs(mut self, secs: i64) -> Self {
        self.key_overlap_secs = secs;
        self
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TokenPolicy::default();
        assert_eq!(policy.access_token_ttl(), Duration::minutes(15));
        assert_eq!(policy.refresh_token_ttl(), Duration::days(7));
        assert_eq!(policy.max_session_age(), Duration::days(30));
        assert_eq!(policy.key_overlap_window(), Duration::hours(1));
    }

    #[test]
    fn test_policy_builder() {
        let policy = TokenPolicy::default()
            .with_access_ttl_minutes(10)
            .with_max_session_age_days(14)
            .with_key_overlap_secs(120);

        assert_eq!(policy.access_token_ttl(), Duration::minutes(10));
        assert_eq!(policy.max_session_age(), Duration::days(14));
        assert_eq!(policy.key_overlap_window(), Duration::seconds(120));
    }
}
