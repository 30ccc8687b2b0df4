//! Local bearer-token payload decoding
//!
//! Extracts identity claims from the middle segment of the three-segment token
//! for display purposes. The signature is never checked here; the server is the
//! sole authority on token validity.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use medilink_core::{token_error, ErrorContext, MedilinkError, MedilinkResult, Role};
use serde::{Deserialize, Serialize};

/// Claims carried in the token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User identifier
    pub id: i64,
    /// Display name
    pub sub: String,
    /// Account role
    pub role: Role,
    /// Expiry as Unix seconds
    pub exp: i64,
}

impl TokenClaims {
    /// Seconds until expiry from the given instant, clamped at zero
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        (self.exp - now).max(0)
    }
}

/// Decode the payload segment of a bearer token
pub fn decode_claims(token: &str) -> MedilinkResult<TokenClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
        _ => {
            return Err(token_error!(
                "Token is not a three-segment bearer token",
                "token"
            ))
        }
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| token_error!(format!("Token payload is not valid base64: {}", e), "token"))?;

    serde_json::from_slice(&decoded).map_err(|e| {
        token_error!(
            format!("Token payload is not a valid claims object: {}", e),
            "token"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mint(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn decodes_well_formed_token() {
        let token = mint(json!({
            "id": 7,
            "sub": "alice",
            "role": "patient",
            "exp": 1_900_000_000_i64,
        }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::Patient);
        assert_eq!(claims.exp, 1_900_000_000);
    }

    #[test]
    fn rejects_token_without_three_segments() {
        assert!(decode_claims("justonesegment").is_err());
        assert!(decode_claims("two.segments").is_err());
        assert!(decode_claims("one.too.many.segments").is_err());
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(decode_claims("aGVhZGVy.!!!notbase64!!!.c2ln").is_err());

        let not_json = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(b"header"),
            URL_SAFE_NO_PAD.encode(b"plain text")
        );
        assert!(decode_claims(&not_json).is_err());
    }

    #[test]
    fn rejects_payload_missing_claims() {
        // `role` missing: all identity fields are required so none get populated
        let token = mint(json!({ "id": 7, "sub": "alice", "exp": 1_900_000_000_i64 }));
        assert!(decode_claims(&token).is_err());
    }

    #[test]
    fn remaining_seconds_clamps_at_zero() {
        let claims = TokenClaims {
            id: 1,
            sub: "bob".to_string(),
            role: Role::Doctor,
            exp: 1000,
        };
        assert_eq!(claims.remaining_seconds(900), 100);
        assert_eq!(claims.remaining_seconds(1000), 0);
        assert_eq!(claims.remaining_seconds(2000), 0);
    }
}
