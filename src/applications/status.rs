// src/applications/status.rs
//! Application status machine.
//!
//! Twelve statuses, one append-only history. Any enum value is a legal
//! target for owner-driven updates; the only state-dependent refusal is
//! candidate withdrawal.

/// Every status an application can hold
pub const APPLICATION_STATUSES: [&str; 12] = [
    "applied",
    "under-review",
    "shortlisted",
    "interview-scheduled",
    "interviewed",
    "offer-pending",
    "offer-made",
    "offer-accepted",
    "offer-rejected",
    "on-hold",
    "rejected",
    "withdrawn",
];

/// Status assigned when the application is created
pub const INITIAL_STATUS: &str = "applied";

/// Statuses from which a candidate may no longer withdraw
const WITHDRAW_BLOCKED: [&str; 3] = ["offer-accepted", "offer-made", "interviewed"];

pub fn is_valid_status(status: &str) -> bool {
    APPLICATION_STATUSES.contains(&status)
}

/// Candidate withdrawal guard
///
/// Fails when the application is already withdrawn or has progressed past
/// the point where withdrawal is allowed.
pub fn can_withdraw(current_status: &str) -> Result<(), String> {
    if current_status == "withdrawn" {
        return Err("Application is already withdrawn".to_string());
    }
    if WITHDRAW_BLOCKED.contains(&current_status) {
        return Err(format!(
            "Cannot withdraw an application with status '{}'",
            current_status
        ));
    }
    Ok(())
}

/// Maps a company response value onto the canonical status channel.
///
/// The legacy system kept company responses in a second, independently
/// mutable status object; here they collapse onto the single status +
/// history log.
pub fn company_response_status(response: &str) -> Option<&'static str> {
    match response {
        "active-consideration" => Some("under-review"),
        "on-hold" => Some("on-hold"),
        "rejected" => Some("rejected"),
        "selected-for-interview" => Some("interview-scheduled"),
        _ => None,
    }
}
