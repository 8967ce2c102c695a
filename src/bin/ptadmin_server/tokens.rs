//! HS256 access/refresh token issuing and verification.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(super) struct Claims {
    pub(super) sub: String,
    pub(super) email: String,
    pub(super) role: String,
    pub(super) typ: String,
    // Unique per token, so two tokens minted in the same second still differ.
    pub(super) jti: String,
    pub(super) iat: i64,
    pub(super) exp: i64,
}

pub(super) struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl TokenIssuer {
    pub(super) fn new(secret: &str, access_ttl: i64, refresh_ttl: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub(super) fn issue(&self, admin: &AdminRecord, kind: TokenKind) -> Result<String> {
        let iat = time::OffsetDateTime::now_utc().unix_timestamp();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = iat
            .checked_add(ttl)
            .with_context(|| format!("{} token expiry overflows", kind.as_str()))?;
        let claims = Claims {
            sub: admin.id.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
            typ: kind.as_str().to_string(),
            jti: generate_id()?,
            iat,
            exp,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .with_context(|| format!("sign {} token", kind.as_str()))
    }

    /// Check signature, expiry (no leeway) and that the token is of `kind`.
    pub(super) fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .context("verify token")?;
        if data.claims.typ != kind.as_str() {
            anyhow::bail!(
                "expected {} token, got {}",
                kind.as_str(),
                data.claims.typ
            );
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
#[path = "../../tests/bin/ptadmin_server/tokens_tests.rs"]
mod tests;
