use axum::http::HeaderValue;

use super::*;

fn headers_with(authorization: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(authorization).expect("header value"),
    );
    headers
}

#[test]
fn bearer_token_takes_second_part() {
    let headers = headers_with("Bearer abc.def.ghi");
    assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
}

#[test]
fn bearer_token_ignores_scheme_name() {
    let headers = headers_with("Token abc");
    assert_eq!(bearer_token(&headers), Some("abc"));
}

#[test]
fn bearer_token_missing_or_unreadable() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
    assert_eq!(bearer_token(&headers_with("Bearer")), None);
    assert_eq!(bearer_token(&headers_with("Bearer ")), None);
}
