//! Scaffolding for acceptance tests against a live backend.
//!
//! A [`TestContext`] owns a logged-in client and every admin account it
//! created, and deletes those accounts when it goes out of scope. Assertions
//! that need the backend's storage go through an injected [`AdminRepository`].

mod fixture;
mod repository;

pub use self::fixture::{TestContext, with_context};
pub use self::repository::{AdminRepository, JsonFileRepository, StoredAdmin};

/// Short random suffix for throwaway account emails.
pub fn unique_suffix() -> String {
    let mut bytes = [0u8; 6];
    if getrandom::getrandom(&mut bytes).is_err() {
        let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
        return format!("{:x}", nanos);
    }
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
