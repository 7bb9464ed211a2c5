use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-account OAuth token record, as persisted in the token file.
///
/// # Example
/// ```
/// use kommo_bridge::auth::AccountToken;
///
/// let token = AccountToken {
///     access_token: "a".to_string(),
///     refresh_token: "b".to_string(),
///     expires: 999,
///     base_domain: "acme.kommo.com".to_string(),
/// };
/// assert!(token.has_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds).
    pub expires: i64,
    pub base_domain: String,
}

impl AccountToken {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires, 0)
    }

    pub fn has_expired(&self) -> bool {
        self.has_expired_at(Utc::now())
    }

    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires < now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires: i64) -> AccountToken {
        AccountToken {
            access_token: "a".to_string(),
            refresh_token: "b".to_string(),
            expires,
            base_domain: "acme.kommo.com".to_string(),
        }
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let future = (Utc::now() + Duration::hours(1)).timestamp();
        assert!(!token(future).has_expired());
    }

    #[test]
    fn expiry_equal_to_now_is_still_valid() {
        let now = Utc::now();
        assert!(!token(now.timestamp()).has_expired_at(now));
        assert!(token(now.timestamp() - 1).has_expired_at(now));
    }

    #[test]
    fn serializes_with_flat_field_names() {
        let json = serde_json::to_value(token(999)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "access_token": "a",
                "refresh_token": "b",
                "expires": 999,
                "base_domain": "acme.kommo.com"
            })
        );
    }
}
