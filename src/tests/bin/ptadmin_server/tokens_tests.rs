use super::*;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn admin() -> AdminRecord {
    new_admin_record(
        "root@example.com",
        "Root",
        ADMIN_ROLE,
        "hash".to_string(),
        None,
    )
    .expect("record")
}

#[test]
fn issued_tokens_verify_with_their_kind() {
    let issuer = TokenIssuer::new(SECRET, 60, 3600);
    let admin = admin();

    let access = issuer.issue(&admin, TokenKind::Access).expect("issue");
    let claims = issuer.verify(&access, TokenKind::Access).expect("verify");
    assert_eq!(claims.sub, admin.id);
    assert_eq!(claims.email, "root@example.com");
    assert_eq!(claims.role, ADMIN_ROLE);
    assert_eq!(claims.exp - claims.iat, 60);

    let refresh = issuer.issue(&admin, TokenKind::Refresh).expect("issue");
    let claims = issuer.verify(&refresh, TokenKind::Refresh).expect("verify");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn token_kinds_are_not_interchangeable() {
    let issuer = TokenIssuer::new(SECRET, 60, 3600);
    let admin = admin();
    let access = issuer.issue(&admin, TokenKind::Access).expect("issue");
    let refresh = issuer.issue(&admin, TokenKind::Refresh).expect("issue");
    assert!(issuer.verify(&access, TokenKind::Refresh).is_err());
    assert!(issuer.verify(&refresh, TokenKind::Access).is_err());
}

#[test]
fn tokens_minted_together_differ() {
    let issuer = TokenIssuer::new(SECRET, 60, 3600);
    let admin = admin();
    let a = issuer.issue(&admin, TokenKind::Access).expect("issue");
    let b = issuer.issue(&admin, TokenKind::Access).expect("issue");
    assert_ne!(a, b);
}

#[test]
fn other_secret_and_garbage_are_rejected() {
    let issuer = TokenIssuer::new(SECRET, 60, 3600);
    let other = TokenIssuer::new("fedcba9876543210fedcba9876543210", 60, 3600);
    let token = other.issue(&admin(), TokenKind::Access).expect("issue");
    assert!(issuer.verify(&token, TokenKind::Access).is_err());
    assert!(issuer.verify("garbled.token.value", TokenKind::Access).is_err());
}

#[test]
fn expired_tokens_are_rejected_without_leeway() {
    let admin = admin();
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: admin.id.clone(),
        email: admin.email.clone(),
        role: admin.role.clone(),
        typ: "access".to_string(),
        jti: "expired".to_string(),
        iat: now - 120,
        exp: now - 1,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode");

    let issuer = TokenIssuer::new(SECRET, 60, 3600);
    assert!(issuer.verify(&token, TokenKind::Access).is_err());
}

#[test]
fn issue_fails_instead_of_wrapping_an_overflowing_expiry() {
    let issuer = TokenIssuer::new(SECRET, i64::MAX, 3600);
    assert!(issuer.issue(&admin(), TokenKind::Access).is_err());
    assert!(issuer.issue(&admin(), TokenKind::Refresh).is_ok());
}
