use ptadmin::config::write_atomic_overwrite;

use super::*;

pub(super) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

pub(super) fn fingerprint(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

pub(super) fn admins_path(data_dir: &std::path::Path) -> std::path::PathBuf {
    data_dir.join("admins.json")
}

pub(super) fn revoked_path(data_dir: &std::path::Path) -> std::path::PathBuf {
    data_dir.join("revoked_refresh.json")
}

pub(super) fn load_admins_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<String, AdminRecord>> {
    let path = admins_path(data_dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(&path).context("read admins.json")?;
    let list: Vec<AdminRecord> = serde_json::from_slice(&bytes).context("parse admins.json")?;
    Ok(list.into_iter().map(|a| (a.id.clone(), a)).collect())
}

pub(super) fn persist_admins_to_disk(
    data_dir: &std::path::Path,
    admins: &HashMap<String, AdminRecord>,
) -> Result<()> {
    let mut list: Vec<&AdminRecord> = admins.values().collect();
    list.sort_by(|a, b| a.email.cmp(&b.email));
    let bytes = serde_json::to_vec_pretty(&list).context("serialize admins")?;
    write_atomic_overwrite(&admins_path(data_dir), &bytes).context("write admins.json")
}

pub(super) fn load_revoked_from_disk(data_dir: &std::path::Path) -> Result<HashMap<String, i64>> {
    let path = revoked_path(data_dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(&path).context("read revoked_refresh.json")?;
    let list: Vec<RevokedRefresh> =
        serde_json::from_slice(&bytes).context("parse revoked_refresh.json")?;
    Ok(list
        .into_iter()
        .map(|r| (r.fingerprint, r.expires_at))
        .collect())
}

pub(super) fn persist_revoked_to_disk(
    data_dir: &std::path::Path,
    revoked: &HashMap<String, i64>,
) -> Result<()> {
    let mut list: Vec<RevokedRefresh> = revoked
        .iter()
        .map(|(fingerprint, expires_at)| RevokedRefresh {
            fingerprint: fingerprint.clone(),
            expires_at: *expires_at,
        })
        .collect();
    list.sort_by(|a, b| a.expires_at.cmp(&b.expires_at));
    let bytes = serde_json::to_vec_pretty(&list).context("serialize revoked refresh tokens")?;
    write_atomic_overwrite(&revoked_path(data_dir), &bytes).context("write revoked_refresh.json")
}

/// Drop entries whose token has expired; verification rejects those already.
pub(super) fn prune_revoked(revoked: &mut HashMap<String, i64>, now: i64) {
    revoked.retain(|_, expires_at| *expires_at > now);
}

/// Holds the write guard across the disk write so persists never interleave.
pub(super) async fn persist_admins(state: &Arc<AppState>) -> Result<(), Response> {
    let admins = state.admins.write().await;
    persist_admins_to_disk(&state.data_dir, &admins).map_err(internal_error)
}

pub(super) fn new_admin_record(
    email: &str,
    name: &str,
    role: &str,
    password_hash: String,
    created_by: Option<String>,
) -> Result<AdminRecord> {
    Ok(AdminRecord {
        id: generate_id()?,
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        password_hash,
        created_at: now_ts(),
        created_by,
        updated_at: None,
        last_login: None,
    })
}

pub(super) fn generate_id() -> Result<String> {
    // 16 bytes of entropy, hex-encoded.
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(32);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/bin/ptadmin_server/identity_store_tests.rs"]
mod tests;
