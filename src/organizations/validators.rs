// src/organizations/validators.rs

use super::models::{CreateOrganizationRequest, UpdateOrganizationRequest};
use crate::common::{ValidationResult, Validator};

const MAX_NAME_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 5000;

fn check_name(result: &mut ValidationResult, name: &str) {
    if name.trim().is_empty() {
        result.add_error("name", "Organization name is required");
    } else if name.chars().count() > MAX_NAME_CHARS {
        result.add_error("name", "Organization name cannot exceed 200 characters");
    }
}

fn check_description(result: &mut ValidationResult, description: Option<&str>) {
    if let Some(text) = description {
        if text.chars().count() > MAX_DESCRIPTION_CHARS {
            result.add_error("description", "Description cannot exceed 5000 characters");
        }
    }
}

fn check_website(result: &mut ValidationResult, website: Option<&str>) {
    if let Some(url) = website {
        let trimmed = url.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("http://") && !trimmed.starts_with("https://")
        {
            result.add_error("website", "Website must start with http:// or https://");
        }
    }
}

pub struct OrganizationValidator;

impl Validator<CreateOrganizationRequest> for OrganizationValidator {
    fn validate(&self, data: &CreateOrganizationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_name(&mut result, &data.name);
        check_description(&mut result, data.description.as_deref());
        check_website(&mut result, data.website.as_deref());
        result
    }
}

impl Validator<UpdateOrganizationRequest> for OrganizationValidator {
    fn validate(&self, data: &UpdateOrganizationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(name) = &data.name {
            check_name(&mut result, name);
        }
        check_description(&mut result, data.description.as_deref());
        check_website(&mut result, data.website.as_deref());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name() {
        let request = CreateOrganizationRequest {
            name: "  ".to_string(),
            description: None,
            website: None,
        };
        let result = OrganizationValidator.validate(&request);
        assert_eq!(
            result.first_message_for("name"),
            Some("Organization name is required")
        );
    }

    #[test]
    fn test_website_scheme_check() {
        let request = CreateOrganizationRequest {
            name: "Nordic Talent Hub".to_string(),
            description: None,
            website: Some("www.example.org".to_string()),
        };
        let result = OrganizationValidator.validate(&request);
        assert!(!result.is_valid);

        let request = CreateOrganizationRequest {
            name: "Nordic Talent Hub".to_string(),
            description: None,
            website: Some("https://example.org".to_string()),
        };
        assert!(OrganizationValidator.validate(&request).is_valid);
    }

    #[test]
    fn test_update_without_name_is_valid() {
        let request = UpdateOrganizationRequest {
            name: None,
            description: Some("We connect freelancers with projects.".to_string()),
            website: None,
        };
        assert!(OrganizationValidator.validate(&request).is_valid);
    }
}
