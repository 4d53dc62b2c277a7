// src/posts/validators.rs

use super::models::{CreatePostRequest, UpdatePostRequest, POST_VISIBILITIES};
use crate::common::{ValidationResult, Validator};

pub const MAX_POST_CHARS: usize = 3000;

fn check_content(result: &mut ValidationResult, content: &str, required: bool) {
    if content.trim().is_empty() {
        if required {
            result.add_error("content", "Post content is required");
        }
    } else if content.chars().count() > MAX_POST_CHARS {
        result.add_error("content", "Post content cannot exceed 3000 characters");
    }
}

fn check_visibility(result: &mut ValidationResult, visibility: Option<&str>) {
    if let Some(value) = visibility {
        if !POST_VISIBILITIES.contains(&value) {
            result.add_error("visibility", "Invalid post visibility");
        }
    }
}

pub struct PostValidator;

impl Validator<CreatePostRequest> for PostValidator {
    fn validate(&self, data: &CreatePostRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_content(&mut result, &data.content, true);
        check_visibility(&mut result, data.visibility.as_deref());
        result
    }
}

impl Validator<UpdatePostRequest> for PostValidator {
    fn validate(&self, data: &UpdatePostRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(content) = &data.content {
            check_content(&mut result, content, true);
        }
        check_visibility(&mut result, data.visibility.as_deref());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_required() {
        let request = CreatePostRequest {
            content: "  ".to_string(),
            visibility: None,
        };
        let result = PostValidator.validate(&request);
        assert_eq!(
            result.first_message_for("content"),
            Some("Post content is required")
        );
    }

    #[test]
    fn test_content_length_cap() {
        let request = CreatePostRequest {
            content: "x".repeat(MAX_POST_CHARS + 1),
            visibility: None,
        };
        let result = PostValidator.validate(&request);
        assert!(!result.is_valid);

        let request = CreatePostRequest {
            content: "x".repeat(MAX_POST_CHARS),
            visibility: None,
        };
        assert!(PostValidator.validate(&request).is_valid);
    }

    #[test]
    fn test_visibility_values() {
        let request = CreatePostRequest {
            content: "Hiring a senior backend engineer".to_string(),
            visibility: Some("friends".to_string()),
        };
        let result = PostValidator.validate(&request);
        assert_eq!(
            result.first_message_for("visibility"),
            Some("Invalid post visibility")
        );

        let request = CreatePostRequest {
            content: "Hiring a senior backend engineer".to_string(),
            visibility: Some("followers".to_string()),
        };
        assert!(PostValidator.validate(&request).is_valid);
    }
}
