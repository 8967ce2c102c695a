use super::*;

#[test]
fn hash_verifies_only_the_original_password() {
    let hash = hash_password("correct horse battery").expect("hash");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("correct horse battery", &hash));
    assert!(!verify_password("wrong horse battery", &hash));
}

#[test]
fn hashes_are_salted() {
    let a = hash_password("same-password").expect("hash");
    let b = hash_password("same-password").expect("hash");
    assert_ne!(a, b);
}

#[test]
fn unparseable_hash_never_verifies() {
    assert!(!verify_password("anything", "plaintext-not-a-hash"));
}
