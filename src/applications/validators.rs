// src/applications/validators.rs

use std::collections::HashSet;

use super::models::{CompanyResponseRequest, SubmissionFields, UpdateStatusRequest};
use super::status::{company_response_status, is_valid_status};
use crate::common::{ValidationResult, Validator};

pub const MAX_COVER_LETTER_CHARS: usize = 5000;
const MAX_ENTRIES: usize = 20;
pub const MAX_MESSAGE_CHARS: usize = 1000;

// ============================================================================
// Submission Validator
// ============================================================================

pub struct SubmissionValidator;

impl Validator<SubmissionFields> for SubmissionValidator {
    fn validate(&self, data: &SubmissionFields) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.cover_letter.trim().is_empty() {
            result.add_error("cover_letter", "Cover letter is required");
        } else if data.cover_letter.chars().count() > MAX_COVER_LETTER_CHARS {
            result.add_error(
                "cover_letter",
                "Cover letter cannot exceed 5000 characters",
            );
        }

        if data.selected_cv_ids.is_empty() {
            result.add_error("selected_cvs", "At least one CV must be selected");
        }

        if data.references.len() > MAX_ENTRIES {
            result.add_error("references", "Too many reference entries");
        }
        if data.work_experience.len() > MAX_ENTRIES {
            result.add_error("work_experience", "Too many work experience entries");
        }

        // Document keys must be present on flagged entries and unique across
        // both entry lists; this is what replaces positional file pairing.
        let mut seen_keys = HashSet::new();

        for (idx, entry) in data.references.iter().enumerate() {
            if entry.provided_as_document {
                match entry.document_key.as_deref().map(str::trim) {
                    Some(key) if !key.is_empty() => {
                        if !seen_keys.insert(key.to_string()) {
                            result.add_error(
                                &format!("references[{}].document_key", idx),
                                "Document key is used more than once",
                            );
                        }
                    }
                    _ => result.add_error(
                        &format!("references[{}].document_key", idx),
                        "A document key is required when a reference is provided as a document",
                    ),
                }
            } else if entry.name.as_deref().map(str::trim).unwrap_or("").is_empty() {
                result.add_error(
                    &format!("references[{}].name", idx),
                    "Reference name is required",
                );
            }
        }

        for (idx, entry) in data.work_experience.iter().enumerate() {
            if entry.provided_as_document {
                match entry.document_key.as_deref().map(str::trim) {
                    Some(key) if !key.is_empty() => {
                        if !seen_keys.insert(key.to_string()) {
                            result.add_error(
                                &format!("work_experience[{}].document_key", idx),
                                "Document key is used more than once",
                            );
                        }
                    }
                    _ => result.add_error(
                        &format!("work_experience[{}].document_key", idx),
                        "A document key is required when an entry is provided as a document",
                    ),
                }
            } else if entry.title.as_deref().map(str::trim).unwrap_or("").is_empty() {
                result.add_error(
                    &format!("work_experience[{}].title", idx),
                    "Work experience title is required",
                );
            }
        }

        result
    }
}

// ============================================================================
// Status Update Validators
// ============================================================================

pub struct StatusUpdateValidator;

impl Validator<UpdateStatusRequest> for StatusUpdateValidator {
    fn validate(&self, data: &UpdateStatusRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !is_valid_status(&data.status) {
            result.add_error("status", "Invalid application status");
        }

        if let Some(message) = &data.message {
            if message.chars().count() > MAX_MESSAGE_CHARS {
                result.add_error("message", "Message must be less than 1000 characters");
            }
        }

        result
    }
}

impl Validator<CompanyResponseRequest> for StatusUpdateValidator {
    fn validate(&self, data: &CompanyResponseRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if company_response_status(&data.response).is_none() {
            result.add_error("response", "Invalid company response value");
        }

        if let Some(message) = &data.message {
            if message.chars().count() > MAX_MESSAGE_CHARS {
                result.add_error("message", "Message must be less than 1000 characters");
            }
        }

        result
    }
}
