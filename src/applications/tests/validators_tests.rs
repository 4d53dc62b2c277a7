// src/applications/tests/validators_tests.rs

use crate::applications::models::{
    CompanyResponseRequest, ReferenceInput, SubmissionFields, UpdateStatusRequest,
    WorkExperienceInput,
};
use crate::applications::validators::{
    StatusUpdateValidator, SubmissionValidator, MAX_COVER_LETTER_CHARS,
};
use crate::common::Validator;

fn minimal_submission() -> SubmissionFields {
    SubmissionFields {
        cover_letter: "I am a great fit for this role.".to_string(),
        selected_cv_ids: vec!["V_ABC123".to_string()],
        ..Default::default()
    }
}

#[test]
fn test_valid_minimal_submission() {
    let result = SubmissionValidator.validate(&minimal_submission());
    assert!(result.is_valid, "errors: {:?}", result.errors);
}

#[test]
fn test_cover_letter_required() {
    let mut data = minimal_submission();
    data.cover_letter = "   ".to_string();
    let result = SubmissionValidator.validate(&data);
    assert!(!result.is_valid);
    assert_eq!(
        result.first_message_for("cover_letter"),
        Some("Cover letter is required")
    );
}

#[test]
fn test_cover_letter_length_cap() {
    let mut data = minimal_submission();
    data.cover_letter = "x".repeat(MAX_COVER_LETTER_CHARS + 1);
    let result = SubmissionValidator.validate(&data);
    assert_eq!(
        result.first_message_for("cover_letter"),
        Some("Cover letter cannot exceed 5000 characters")
    );

    data.cover_letter = "x".repeat(MAX_COVER_LETTER_CHARS);
    assert!(SubmissionValidator.validate(&data).is_valid);
}

#[test]
fn test_at_least_one_cv_required() {
    let mut data = minimal_submission();
    data.selected_cv_ids.clear();
    let result = SubmissionValidator.validate(&data);
    assert_eq!(
        result.first_message_for("selected_cvs"),
        Some("At least one CV must be selected")
    );
}

#[test]
fn test_structured_reference_needs_name() {
    let mut data = minimal_submission();
    data.references.push(ReferenceInput::default());
    let result = SubmissionValidator.validate(&data);
    assert!(!result.is_valid);
    assert_eq!(
        result.first_message_for("references[0].name"),
        Some("Reference name is required")
    );
}

#[test]
fn test_document_reference_needs_key() {
    let mut data = minimal_submission();
    data.references.push(ReferenceInput {
        provided_as_document: true,
        ..Default::default()
    });
    let result = SubmissionValidator.validate(&data);
    assert!(!result.is_valid);
    assert!(result.first_message_for("references[0].document_key").is_some());
}

#[test]
fn test_document_keys_must_be_unique_across_lists() {
    let mut data = minimal_submission();
    data.references.push(ReferenceInput {
        provided_as_document: true,
        document_key: Some("doc_0".to_string()),
        ..Default::default()
    });
    data.work_experience.push(WorkExperienceInput {
        provided_as_document: true,
        document_key: Some("doc_0".to_string()),
        ..Default::default()
    });

    let result = SubmissionValidator.validate(&data);
    assert!(!result.is_valid);
    assert_eq!(
        result.first_message_for("work_experience[0].document_key"),
        Some("Document key is used more than once")
    );
}

#[test]
fn test_structured_experience_needs_title() {
    let mut data = minimal_submission();
    data.work_experience.push(WorkExperienceInput {
        company: Some("Acme".to_string()),
        ..Default::default()
    });
    let result = SubmissionValidator.validate(&data);
    assert_eq!(
        result.first_message_for("work_experience[0].title"),
        Some("Work experience title is required")
    );
}

#[test]
fn test_too_many_entries() {
    let mut data = minimal_submission();
    for _ in 0..21 {
        data.references.push(ReferenceInput {
            name: Some("R".to_string()),
            ..Default::default()
        });
    }
    let result = SubmissionValidator.validate(&data);
    assert_eq!(
        result.first_message_for("references"),
        Some("Too many reference entries")
    );
}

#[test]
fn test_status_update_validator() {
    let ok = UpdateStatusRequest {
        status: "shortlisted".to_string(),
        message: Some("Looks strong".to_string()),
        interview_details: None,
    };
    assert!(StatusUpdateValidator.validate(&ok).is_valid);

    let bad = UpdateStatusRequest {
        status: "approved".to_string(),
        message: None,
        interview_details: None,
    };
    let result = StatusUpdateValidator.validate(&bad);
    assert_eq!(
        result.first_message_for("status"),
        Some("Invalid application status")
    );
}

#[test]
fn test_status_update_message_cap() {
    let request = UpdateStatusRequest {
        status: "under-review".to_string(),
        message: Some("x".repeat(1001)),
        interview_details: None,
    };
    let result = StatusUpdateValidator.validate(&request);
    assert_eq!(
        result.first_message_for("message"),
        Some("Message must be less than 1000 characters")
    );
}

#[test]
fn test_company_response_validator() {
    let ok = CompanyResponseRequest {
        response: "selected-for-interview".to_string(),
        message: None,
    };
    assert!(StatusUpdateValidator.validate(&ok).is_valid);

    let bad = CompanyResponseRequest {
        response: "maybe".to_string(),
        message: None,
    };
    let result = StatusUpdateValidator.validate(&bad);
    assert_eq!(
        result.first_message_for("response"),
        Some("Invalid company response value")
    );
}
