use super::*;

#[test]
fn email_shape_is_checked() {
    assert!(validate_email("root@example.com").is_ok());
    for bad in [
        "",
        "root",
        "@example.com",
        "root@",
        "root@localhost",
        "root@.com",
        "root@example.",
        "a@b@example.com",
        "ro ot@example.com",
    ] {
        assert!(validate_email(bad).is_err(), "{:?} should be rejected", bad);
    }
}

#[test]
fn emails_normalize_to_trimmed_lowercase() {
    assert_eq!(normalize_email("  Root@Example.COM "), "root@example.com");
}

#[test]
fn new_passwords_need_eight_characters() {
    assert!(validate_new_password("1234567").is_err());
    assert!(validate_new_password("12345678").is_ok());
}

#[test]
fn jwt_secret_needs_32_characters() {
    assert!(validate_jwt_secret(&"x".repeat(31)).is_err());
    assert!(validate_jwt_secret(&"x".repeat(32)).is_ok());
}

#[test]
fn ttl_parses_each_unit() {
    assert_eq!(parse_ttl("30s").expect("secs"), 30);
    assert_eq!(parse_ttl("15m").expect("mins"), 900);
    assert_eq!(parse_ttl("1h").expect("hours"), 3600);
    assert_eq!(parse_ttl("7d").expect("days"), 604_800);
}

#[test]
fn ttl_rejects_malformed_values() {
    for bad in ["", "m", "15", "15x", "-5m", "1.5h", "0s"] {
        assert!(parse_ttl(bad).is_err(), "{:?} should be rejected", bad);
    }
}

#[test]
fn ttl_rejects_values_that_overflow_or_exceed_the_cap() {
    assert!(parse_ttl("999999999999999999d").is_err());
    assert!(parse_ttl("9223372036854775807s").is_err());
    assert!(parse_ttl(&format!("{}s", MAX_TTL_SECS + 1)).is_err());
    assert_eq!(
        parse_ttl(&format!("{}s", MAX_TTL_SECS)).expect("cap"),
        MAX_TTL_SECS
    );
    assert_eq!(parse_ttl("3650d").expect("ten years"), MAX_TTL_SECS);
}
