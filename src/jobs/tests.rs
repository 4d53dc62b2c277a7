//! Tests for jobs module

#[cfg(test)]
mod tests {
    use crate::common::Validator;
    use crate::jobs::models::{CreateJobRequest, Job};
    use crate::jobs::validators::JobValidator;
    use chrono::{Duration, Utc};

    fn job_with_deadline(deadline: Option<String>) -> Job {
        Job {
            id: "J_K7NP3X".to_string(),
            owner_type: "company".to_string(),
            owner_id: "C_K7NP3X".to_string(),
            title: "Backend Engineer".to_string(),
            description: None,
            location: None,
            employment_type: None,
            salary_min: None,
            salary_max: None,
            status: "active".to_string(),
            application_deadline: deadline,
            application_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_deadline_in_past_is_closed() {
        let past = (Utc::now() - Duration::days(1)).to_rfc3339();
        let job = job_with_deadline(Some(past));
        assert!(job.deadline_passed(Utc::now()));
    }

    #[test]
    fn test_deadline_in_future_accepts() {
        let future = (Utc::now() + Duration::days(7)).to_rfc3339();
        let job = job_with_deadline(Some(future));
        assert!(!job.deadline_passed(Utc::now()));
    }

    #[test]
    fn test_missing_or_garbled_deadline_accepts() {
        assert!(!job_with_deadline(None).deadline_passed(Utc::now()));
        assert!(!job_with_deadline(Some("next tuesday".to_string())).deadline_passed(Utc::now()));
    }

    #[test]
    fn test_create_job_requires_title() {
        let request = CreateJobRequest {
            title: "   ".to_string(),
            description: None,
            location: None,
            employment_type: None,
            salary_min: None,
            salary_max: None,
            status: None,
            application_deadline: None,
        };

        let result = JobValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.first_message_for("title").is_some());
    }

    #[test]
    fn test_create_job_rejects_inverted_salary_range() {
        let request = CreateJobRequest {
            title: "Backend Engineer".to_string(),
            description: None,
            location: None,
            employment_type: None,
            salary_min: Some(90_000),
            salary_max: Some(60_000),
            status: Some("active".to_string()),
            application_deadline: None,
        };

        let result = JobValidator.validate(&request);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_create_job_rejects_unknown_status() {
        let request = CreateJobRequest {
            title: "Backend Engineer".to_string(),
            description: None,
            location: None,
            employment_type: None,
            salary_min: None,
            salary_max: None,
            status: Some("archived".to_string()),
            application_deadline: None,
        };

        let result = JobValidator.validate(&request);
        assert!(!result.is_valid);
    }
}
