use super::*;

fn token(exp: i64) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &serde_json::json!({ "sub": "a1", "exp": exp, "jti": exp.to_string() }),
        &jsonwebtoken::EncodingKey::from_secret(b"session-tests"),
    )
    .expect("encode token")
}

fn user() -> AdminUser {
    AdminUser {
        id: Some("a1".into()),
        email: "root@example.com".into(),
        name: Some("Root".into()),
        role: Some("admin".into()),
        created_at: None,
        created_by: None,
        last_login: None,
    }
}

fn session(access_exp: i64, refresh_exp: i64) -> Session {
    Session::establish(
        user(),
        TokenPair {
            access_token: token(access_exp),
            refresh_token: token(refresh_exp),
        },
    )
    .expect("establish")
}

#[test]
fn establish_records_both_expiries() {
    let s = session(1_000, 9_000);
    assert_eq!(s.access_expires_at(), 1_000);
    assert_eq!(s.refresh_expires_at(), 9_000);
    assert_eq!(s.user.email, "root@example.com");
}

#[test]
fn establish_rejects_malformed_tokens() {
    let err = Session::establish(
        user(),
        TokenPair {
            access_token: "nope".into(),
            refresh_token: token(9_000),
        },
    )
    .expect_err("malformed access token");
    assert!(matches!(err, ApiError::MalformedToken(_)));
}

#[test]
fn state_honours_skew() {
    let s = session(1_000, 9_000);
    assert_eq!(s.state_at(900, 5), SessionState::Authenticated);
    assert_eq!(s.state_at(995, 5), SessionState::NeedsRefresh);
    assert_eq!(s.state_at(995, 0), SessionState::Authenticated);
    assert_eq!(s.state_at(1_000, 0), SessionState::NeedsRefresh);
}

#[test]
fn refresh_usable_until_refresh_expiry() {
    let s = session(1_000, 9_000);
    assert!(s.refresh_usable_at(8_999));
    assert!(!s.refresh_usable_at(9_000));
}

#[test]
fn apply_refresh_keeps_refresh_token_unless_rotated() {
    let mut s = session(1_000, 9_000);
    let original_refresh = s.refresh_token().to_string();

    s.apply_refresh(token(2_000), None).expect("apply");
    assert_eq!(s.access_expires_at(), 2_000);
    assert_eq!(s.refresh_token(), original_refresh);

    let rotated = token(10_000);
    s.apply_refresh(token(3_000), Some(rotated.clone()))
        .expect("apply rotated");
    assert_eq!(s.access_expires_at(), 3_000);
    assert_eq!(s.refresh_token(), rotated);
    assert_eq!(s.refresh_expires_at(), 10_000);
}

#[test]
fn apply_refresh_leaves_session_untouched_on_bad_token() {
    let mut s = session(1_000, 9_000);
    let before = s.access_token().to_string();
    assert!(s.apply_refresh("bad".into(), None).is_err());
    assert_eq!(s.access_token(), before);
}
