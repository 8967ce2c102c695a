use tempfile::tempdir;

use super::*;

#[test]
fn missing_file_is_an_empty_store() {
    let temp = tempdir().expect("create temp dir");
    let repo = JsonFileRepository::in_data_dir(temp.path());
    assert!(repo.list().expect("list").is_empty());
}

#[test]
fn reads_records_written_by_the_server() {
    let temp = tempdir().expect("create temp dir");
    let records = serde_json::json!([
        {
            "id": "a1",
            "email": "root@example.com",
            "name": "Root",
            "role": "admin",
            "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$abc$def",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": null,
            "last_login": "2026-01-02T00:00:00Z"
        },
        {
            "id": "b2",
            "email": "ops@example.com",
            "name": "Ops",
            "role": "admin",
            "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$ghi$jkl",
            "created_at": "2026-01-03T00:00:00Z",
            "created_by": "root@example.com"
        }
    ]);
    std::fs::write(
        temp.path().join("admins.json"),
        serde_json::to_vec(&records).expect("serialize"),
    )
    .expect("write admins.json");

    let repo = JsonFileRepository::in_data_dir(temp.path());
    assert_eq!(repo.list().expect("list").len(), 2);

    let ops = repo
        .find_by_email("ops@example.com")
        .expect("find")
        .expect("present");
    assert_eq!(ops.created_by.as_deref(), Some("root@example.com"));
    assert!(ops.last_login.is_none());
    assert!(repo.find_by_email("nobody@example.com").expect("find").is_none());
}

#[test]
fn corrupt_file_is_an_error() {
    let temp = tempdir().expect("create temp dir");
    std::fs::write(temp.path().join("admins.json"), b"{not json").expect("write");
    let repo = JsonFileRepository::in_data_dir(temp.path());
    assert!(repo.list().is_err());
}
