use super::*;

/// Load `admins.json`, seeding the configured admin when the store is empty.
pub(super) fn load_or_seed_admins(args: &Args) -> Result<HashMap<String, AdminRecord>> {
    let mut admins = load_admins_from_disk(&args.data_dir)?;
    if !admins.is_empty() {
        info!(count = admins.len(), "loaded admins");
        return Ok(admins);
    }

    let (Some(email), Some(password)) = (&args.seed_admin_email, &args.seed_admin_password)
    else {
        info!("no admins yet; create one with POST /api/admin/setup");
        return Ok(admins);
    };

    let email = normalize_email(email);
    validate_email(&email).context("invalid --seed-admin-email")?;
    validate_new_password(password).context("invalid --seed-admin-password")?;
    let name = args.seed_admin_name.trim();
    if name.is_empty() {
        anyhow::bail!("--seed-admin-name cannot be empty");
    }

    let record = new_admin_record(&email, name, ADMIN_ROLE, hash_password(password)?, None)?;
    admins.insert(record.id.clone(), record);
    persist_admins_to_disk(&args.data_dir, &admins)?;
    info!(%email, "seeded initial admin");
    Ok(admins)
}

#[cfg(test)]
#[path = "../../tests/bin/ptadmin_server/runtime_tests.rs"]
mod tests;
