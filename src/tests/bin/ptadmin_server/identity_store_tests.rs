use tempfile::tempdir;

use super::*;

fn record(email: &str) -> AdminRecord {
    new_admin_record(email, "Someone", ADMIN_ROLE, "hash".to_string(), None).expect("record")
}

#[test]
fn admins_round_trip_through_disk() {
    let temp = tempdir().expect("create temp dir");
    assert!(load_admins_from_disk(temp.path()).expect("load empty").is_empty());

    let mut admins = HashMap::new();
    for email in ["b@example.com", "a@example.com"] {
        let r = record(email);
        admins.insert(r.id.clone(), r);
    }
    persist_admins_to_disk(temp.path(), &admins).expect("persist");

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(admins_path(temp.path())).expect("read"))
            .expect("parse");
    let emails: Vec<&str> = raw
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|a| a.get("email").and_then(|e| e.as_str()))
        .collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    assert!(raw[0].get("password_hash").is_some());

    let loaded = load_admins_from_disk(temp.path()).expect("load");
    assert_eq!(loaded.len(), 2);
    for (id, admin) in &loaded {
        assert_eq!(admins[id].email, admin.email);
    }
}

#[test]
fn revoked_tokens_persist_and_prune() {
    let temp = tempdir().expect("create temp dir");
    let mut revoked = HashMap::new();
    revoked.insert(fingerprint("old-token"), 100);
    revoked.insert(fingerprint("live-token"), 10_000);
    persist_revoked_to_disk(temp.path(), &revoked).expect("persist");

    let mut loaded = load_revoked_from_disk(temp.path()).expect("load");
    assert_eq!(loaded, revoked);

    prune_revoked(&mut loaded, 500);
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains_key(&fingerprint("live-token")));
}

#[test]
fn fingerprint_is_stable_and_hides_the_token() {
    let fp = fingerprint("secret-token");
    assert_eq!(fp, fingerprint("secret-token"));
    assert_ne!(fp, fingerprint("other-token"));
    assert_eq!(fp.len(), 64);
    assert!(!fp.contains("secret"));
}

#[test]
fn generated_ids_are_unique_hex() {
    let a = generate_id().expect("id");
    let b = generate_id().expect("id");
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}
