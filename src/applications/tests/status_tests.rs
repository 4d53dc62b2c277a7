// src/applications/tests/status_tests.rs

use crate::applications::status::{
    can_withdraw, company_response_status, is_valid_status, APPLICATION_STATUSES, INITIAL_STATUS,
};

#[test]
fn test_initial_status_is_a_known_status() {
    assert!(APPLICATION_STATUSES.contains(&INITIAL_STATUS));
    assert_eq!(INITIAL_STATUS, "applied");
}

#[test]
fn test_is_valid_status() {
    assert!(is_valid_status("under-review"));
    assert!(is_valid_status("offer-accepted"));
    assert!(!is_valid_status("pending"));
    assert!(!is_valid_status(""));
    assert!(!is_valid_status("Under-Review"));
}

#[test]
fn test_withdraw_allowed_from_early_statuses() {
    assert!(can_withdraw("applied").is_ok());
    assert!(can_withdraw("under-review").is_ok());
    assert!(can_withdraw("shortlisted").is_ok());
    assert!(can_withdraw("interview-scheduled").is_ok());
    assert!(can_withdraw("on-hold").is_ok());
    assert!(can_withdraw("rejected").is_ok());
}

#[test]
fn test_withdraw_refused_when_already_withdrawn() {
    let err = can_withdraw("withdrawn").unwrap_err();
    assert_eq!(err, "Application is already withdrawn");
}

#[test]
fn test_withdraw_refused_after_progression() {
    for status in ["offer-accepted", "offer-made", "interviewed"] {
        let err = can_withdraw(status).unwrap_err();
        assert!(err.contains(status), "unexpected message: {}", err);
    }
}

#[test]
fn test_company_response_mapping() {
    assert_eq!(
        company_response_status("active-consideration"),
        Some("under-review")
    );
    assert_eq!(company_response_status("on-hold"), Some("on-hold"));
    assert_eq!(company_response_status("rejected"), Some("rejected"));
    assert_eq!(
        company_response_status("selected-for-interview"),
        Some("interview-scheduled")
    );
    assert_eq!(company_response_status("hired"), None);
}

#[test]
fn test_company_responses_land_on_known_statuses() {
    for response in [
        "active-consideration",
        "on-hold",
        "rejected",
        "selected-for-interview",
    ] {
        let status = company_response_status(response).unwrap();
        assert!(is_valid_status(status));
    }
}
