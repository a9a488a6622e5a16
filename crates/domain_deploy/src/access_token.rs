//! Short-lived tokens granting TTY access to an application database

use chrono::{DateTime, Duration, Utc};
use mapping_core::record_shape;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TtyAccessToken {
    pub id: Uuid,
    pub token: String,
    pub database_url: String,
    pub request_id: Uuid,
    /// Lifetime in seconds
    pub ttl: i32,
    pub created_at: DateTime<Utc>,
}

record_shape!(TtyAccessToken {
    id => "id",
    token => "token",
    database_url => "database_url",
    request_id => "request_id",
    ttl => "ttl",
    created_at => "created_at",
});

impl TtyAccessToken {
    /// Issues a token for a TTY request, created now
    pub fn issue(token: impl Into<String>, database_url: impl Into<String>, request_id: Uuid, ttl: i32) -> Self {
        Self {
            id: Uuid::nil(),
            token: token.into(),
            database_url: database_url.into(),
            request_id,
            ttl,
            created_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(i64::from(self.ttl))
    }

    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at >= self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expiry() {
        let mut token = TtyAccessToken::issue("tok", "postgres://db", Uuid::new_v4(), 300);
        token.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(token.expires_at(), Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap());
        assert!(!token.is_expired(Utc.with_ymd_and_hms(2024, 5, 1, 12, 4, 59).unwrap()));
        assert!(token.is_expired(Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap()));
    }
}
