use tempfile::tempdir;

use super::*;

fn args_with_data_dir(data_dir: PathBuf) -> Args {
    Args {
        addr: "127.0.0.1:0".parse().expect("parse socket addr"),
        addr_file: None,
        data_dir,
        jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
        access_ttl: "15m".to_string(),
        refresh_ttl: "7d".to_string(),
        rotate_refresh_tokens: false,
        seed_admin_email: None,
        seed_admin_password: None,
        seed_admin_name: "Admin".to_string(),
    }
}

#[test]
fn empty_store_without_seed_stays_empty() {
    let temp = tempdir().expect("create temp dir");
    let args = args_with_data_dir(temp.path().to_path_buf());

    let admins = load_or_seed_admins(&args).expect("load admins");
    assert!(admins.is_empty());
    assert!(!admins_path(temp.path()).exists());
}

#[test]
fn seed_admin_is_hashed_and_persisted() {
    let temp = tempdir().expect("create temp dir");
    let mut args = args_with_data_dir(temp.path().to_path_buf());
    args.seed_admin_email = Some(" Root@Example.com ".to_string());
    args.seed_admin_password = Some("seed-password".to_string());

    let admins = load_or_seed_admins(&args).expect("seed admins");
    assert_eq!(admins.len(), 1);
    let admin = admins.values().next().expect("seeded admin");
    assert_eq!(admin.email, "root@example.com");
    assert_eq!(admin.role, ADMIN_ROLE);
    assert!(verify_password("seed-password", &admin.password_hash));
    assert!(admins_path(temp.path()).exists());
}

#[test]
fn existing_store_is_not_reseeded() {
    let temp = tempdir().expect("create temp dir");
    let mut args = args_with_data_dir(temp.path().to_path_buf());
    args.seed_admin_email = Some("root@example.com".to_string());
    args.seed_admin_password = Some("seed-password".to_string());
    let first = load_or_seed_admins(&args).expect("seed admins");

    args.seed_admin_email = Some("other@example.com".to_string());
    let second = load_or_seed_admins(&args).expect("load admins");
    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
}

#[test]
fn short_seed_password_is_refused() {
    let temp = tempdir().expect("create temp dir");
    let mut args = args_with_data_dir(temp.path().to_path_buf());
    args.seed_admin_email = Some("root@example.com".to_string());
    args.seed_admin_password = Some("short".to_string());
    assert!(load_or_seed_admins(&args).is_err());
}
