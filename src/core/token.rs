//! Bearer token helpers.
//!
//! Claims are decoded from the unverified JWT payload and are only
//! used for display (expiry countdown, listing scopes). Graph is the
//! only authority on whether a call is allowed.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Strip whitespace and an optional `Bearer` scheme. A bare scheme
/// with no credentials yields an empty token.
pub fn bearer_token(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {
            let rest = &trimmed[6..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawClaims {
    exp: Option<i64>,
    scp: Option<String>,
    upn: Option<String>,
    preferred_username: Option<String>,
    tid: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TokenHints {
    pub expires_at: Option<DateTime<Utc>>,
    pub scopes: Vec<String>,
    pub user: Option<String>,
    pub tenant_id: Option<String>,
}

impl TokenHints {
    pub fn decode(raw: &str) -> Option<Self> {
        let token = bearer_token(raw);
        let payload = token.split('.').nth(1)?;
        // Tolerate padded segments from non-conforming issuers
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: RawClaims = serde_json::from_slice(&bytes).ok()?;

        Some(Self {
            expires_at: claims
                .exp
                .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
            scopes: claims
                .scp
                .map(|scp| scp.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            user: claims.upn.or(claims.preferred_username),
            tenant_id: claims.tid,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s.eq_ignore_ascii_case(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn make_token(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_bearer_token_strips_prefix() {
        assert_eq!(bearer_token("  Bearer abc.def "), "abc.def");
        assert_eq!(bearer_token("bearer abc"), "abc");
        assert_eq!(bearer_token("abc"), "abc");
        assert_eq!(bearer_token(""), "");
    }

    #[test]
    fn test_bearer_token_scheme_without_credentials() {
        assert_eq!(bearer_token("Bearer "), "");
        assert_eq!(bearer_token("Bearer"), "");
        assert_eq!(bearer_token("  bearer  "), "");
        assert_eq!(bearer_token("Bearer\tabc"), "abc");
        assert_eq!(bearer_token("Bearerish"), "Bearerish");
    }

    #[test]
    fn test_decode_claims() {
        let token = make_token(
            r#"{"exp":1700000000,"scp":"User.Read Calendars.ReadWrite","upn":"ada@contoso.com","tid":"t-1"}"#,
        );
        let hints = TokenHints::decode(&format!("Bearer {}", token)).unwrap();

        assert_eq!(hints.expires_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(hints.scopes, vec!["User.Read", "Calendars.ReadWrite"]);
        assert_eq!(hints.user.as_deref(), Some("ada@contoso.com"));
        assert_eq!(hints.tenant_id.as_deref(), Some("t-1"));
        assert!(hints.has_scope("calendars.readwrite"));
        assert!(!hints.has_scope("Mail.Send"));
        assert!(hints.is_expired(Utc::now()));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TokenHints::decode("not-a-jwt").is_none());
        assert!(TokenHints::decode("a.%%%.c").is_none());
    }

    #[test]
    fn test_missing_exp_never_expires() {
        let hints = TokenHints::decode(&make_token(r#"{"preferred_username":"bob@x.com"}"#)).unwrap();
        assert!(!hints.is_expired(Utc::now()));
        assert_eq!(hints.user.as_deref(), Some("bob@x.com"));
    }
}
