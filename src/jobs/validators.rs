// src/jobs/validators.rs

use chrono::DateTime;

use super::models::{CreateJobRequest, UpdateJobRequest};
use crate::common::{ValidationResult, Validator};

pub const JOB_STATUSES: [&str; 3] = ["draft", "active", "closed"];

pub struct JobValidator;

fn validate_common(
    result: &mut ValidationResult,
    title: Option<&str>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    status: Option<&str>,
    deadline: Option<&str>,
) {
    if let Some(title) = title {
        if title.trim().is_empty() {
            result.add_error("title", "Title is required");
        } else if title.chars().count() > 200 {
            result.add_error("title", "Title must be less than 200 characters");
        }
    }

    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if min > max {
            result.add_error("salary", "Minimum salary cannot exceed maximum salary");
        }
    }
    if salary_min.map(|v| v < 0).unwrap_or(false) || salary_max.map(|v| v < 0).unwrap_or(false) {
        result.add_error("salary", "Salary values cannot be negative");
    }

    if let Some(status) = status {
        if !JOB_STATUSES.contains(&status) {
            result.add_error("status", "Status must be draft, active, or closed");
        }
    }

    if let Some(deadline) = deadline {
        if DateTime::parse_from_rfc3339(deadline).is_err() {
            result.add_error(
                "application_deadline",
                "Application deadline must be an RFC 3339 timestamp",
            );
        }
    }
}

impl Validator<CreateJobRequest> for JobValidator {
    fn validate(&self, data: &CreateJobRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_common(
            &mut result,
            Some(&data.title),
            data.salary_min,
            data.salary_max,
            data.status.as_deref(),
            data.application_deadline.as_deref(),
        );
        result
    }
}

impl Validator<UpdateJobRequest> for JobValidator {
    fn validate(&self, data: &UpdateJobRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_common(
            &mut result,
            data.title.as_deref(),
            data.salary_min,
            data.salary_max,
            data.status.as_deref(),
            data.application_deadline.as_deref(),
        );
        result
    }
}
