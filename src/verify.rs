//! Acceptance suite for the backend's admin auth contract.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ClientConfig;
use crate::harness::{AdminRepository, TestContext, with_context};
use crate::model::Credentials;

mod checks;

/// Backend under test and the admin account used to drive it.
#[derive(Clone, Debug)]
pub struct Target {
    pub config: ClientConfig,
    pub credentials: Credentials,

    /// When set, also rotate the account's password to this value and back.
    pub rotate_password: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Report {
    pub base_url: String,
    pub checks: Vec<CheckOutcome>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn render(&self) -> String {
        let mut out = format!("Backend: {}\n", self.base_url);
        for check in &self.checks {
            let mark = if check.passed { "PASS" } else { "FAIL" };
            match &check.detail {
                Some(detail) => out.push_str(&format!("{}  {}: {}\n", mark, check.name, detail)),
                None => out.push_str(&format!("{}  {}\n", mark, check.name)),
            }
        }
        let passed = self.checks.iter().filter(|c| c.passed).count();
        out.push_str(&format!("{}/{} checks passed\n", passed, self.checks.len()));
        out
    }
}

/// Run every check against `target`, in order. A failing check does not stop
/// the suite; accounts created along the way are removed before returning.
pub fn run(target: &Target, repository: Option<Box<dyn AdminRepository>>) -> Result<Report> {
    let ctx = TestContext::login(target.config.clone(), &target.credentials, repository)
        .context("log in as the verifying admin")?;

    let checks = with_context(ctx, |ctx| {
        let mut outcomes = Vec::new();
        for (name, check) in checks::suite(target) {
            let outcome = match check(target, ctx) {
                Ok(()) => CheckOutcome {
                    name,
                    passed: true,
                    detail: None,
                },
                Err(err) => CheckOutcome {
                    name,
                    passed: false,
                    detail: Some(format!("{:#}", err)),
                },
            };
            info!(check = name, passed = outcome.passed, "check finished");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    })?;

    Ok(Report {
        base_url: target.config.base_url.clone(),
        checks,
    })
}

#[cfg(test)]
#[path = "tests/verify_tests.rs"]
mod tests;
