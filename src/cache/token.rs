use chrono::{DateTime, Duration, Utc};

use crate::config::settings::TokenSettings;

/// One cached credential and the instant it stops being reusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Valid strictly before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Lifetime information reported by an auth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    /// static credential, never cached
    Unbounded,
    /// the flow reports nothing; assume the configured nominal lifetime
    Nominal,
    /// `expires_in` from the token endpoint, if present
    Reported(Option<u64>),
}

/// Expiry to cache for a token issued at `issued_at`, or None when it must not be cached.
///
/// The safety margin is subtracted from the lifetime and the result is floored at
/// `min_lifetime_seconds`, so the expiry is always in the future.
pub fn compute_expiry(
    settings: &TokenSettings,
    issued_at: DateTime<Utc>,
    lifetime: TokenLifetime,
) -> Option<DateTime<Utc>> {
    let lifetime_seconds = match lifetime {
        TokenLifetime::Unbounded => return None,
        TokenLifetime::Nominal => settings.bearer_lifetime_seconds,
        TokenLifetime::Reported(expires_in) => {
            expires_in.unwrap_or(settings.default_expires_in_seconds)
        }
    };
    let effective = lifetime_seconds
        .saturating_sub(settings.safety_margin_seconds)
        .max(settings.min_lifetime_seconds);
    let expiry = i64::try_from(effective)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    Some(expiry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn bearer_tokens_live_fifty_five_minutes() {
        let expiry = compute_expiry(&TokenSettings::default(), t0(), TokenLifetime::Nominal);
        assert_eq!(expiry, Some(t0() + Duration::minutes(55)));
    }

    #[test]
    fn reported_lifetime_subtracts_margin_and_defaults() {
        let settings = TokenSettings::default();
        assert_eq!(
            compute_expiry(&settings, t0(), TokenLifetime::Reported(Some(7200))),
            Some(t0() + Duration::seconds(6900))
        );
        assert_eq!(
            compute_expiry(&settings, t0(), TokenLifetime::Reported(None)),
            Some(t0() + Duration::seconds(3300))
        );
    }

    #[test]
    fn short_lifetimes_are_floored() {
        let settings = TokenSettings::default();
        let expiry = compute_expiry(&settings, t0(), TokenLifetime::Reported(Some(120))).unwrap();
        assert_eq!(expiry, t0() + Duration::seconds(30));
        assert!(expiry > t0());
    }

    #[test]
    fn static_credentials_have_no_expiry() {
        assert_eq!(compute_expiry(&TokenSettings::default(), t0(), TokenLifetime::Unbounded), None);
    }

    #[test]
    fn validity_is_strictly_before_expiry() {
        let token = CachedToken::new("tok".into(), t0());
        assert!(token.is_valid_at(t0() - Duration::milliseconds(1)));
        assert!(!token.is_valid_at(t0()));
    }
}
