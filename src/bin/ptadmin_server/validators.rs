use super::*;

pub(super) fn validate_email(email: &str) -> Result<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(anyhow::anyhow!("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(anyhow::anyhow!("email must have a local part and a domain"));
    }
    if domain.contains('@') || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(anyhow::anyhow!("email domain is invalid"));
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(anyhow::anyhow!("email cannot contain whitespace"));
    }
    Ok(())
}

/// Lower-cased, trimmed form used for storage and lookups.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(super) const MIN_PASSWORD_LEN: usize = 8;

pub(super) fn validate_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(anyhow::anyhow!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

pub(super) fn validate_jwt_secret(secret: &str) -> Result<()> {
    if secret.len() < 32 {
        return Err(anyhow::anyhow!("JWT secret must be at least 32 characters"));
    }
    Ok(())
}

/// Upper bound for token lifetimes.
pub(super) const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Parse `<n>s|m|h|d` into seconds.
pub(super) fn parse_ttl(value: &str) -> Result<i64> {
    let value = value.trim();
    let Some(unit) = value.chars().last() else {
        return Err(anyhow::anyhow!("duration cannot be empty"));
    };
    let digits = &value[..value.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow::anyhow!(
            "duration must look like 30s, 15m, 1h or 7d (got {:?})",
            value
        ));
    }
    let n: i64 = digits
        .parse()
        .with_context(|| format!("parse duration {:?}", value))?;
    let unit_secs: i64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        other => {
            return Err(anyhow::anyhow!(
                "unknown duration unit {:?} (use s, m, h or d)",
                other
            ));
        }
    };
    let secs = n
        .checked_mul(unit_secs)
        .filter(|s| *s <= MAX_TTL_SECS)
        .ok_or_else(|| anyhow::anyhow!("duration {:?} is longer than 10 years", value))?;
    if secs == 0 {
        return Err(anyhow::anyhow!("duration must be positive"));
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "../../tests/bin/ptadmin_server/validators_tests.rs"]
mod tests;
