// src/applications/tests/parse_tests.rs

use std::collections::HashMap;

use crate::applications::models::SubmissionFields;
use crate::applications::parse::{merge_skills, parse_json_field, string_list_from_value};

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_parse_json_field_degrades_to_string() {
    assert_eq!(parse_json_field(r#"["a","b"]"#).as_array().unwrap().len(), 2);
    assert_eq!(
        parse_json_field("not json at all").as_str(),
        Some("not json at all")
    );
}

#[test]
fn test_string_list_from_array() {
    let value = parse_json_field(r#"["Rust", " SQL ", "", 42]"#);
    assert_eq!(string_list_from_value(&value), vec!["Rust", "SQL"]);
}

#[test]
fn test_string_list_from_degraded_string() {
    let value = parse_json_field("just one skill");
    assert_eq!(string_list_from_value(&value), vec!["just one skill"]);

    let empty = parse_json_field("   ");
    assert!(string_list_from_value(&empty).is_empty());
}

#[test]
fn test_merge_skills_case_insensitive_first_casing_wins() {
    let profile = vec!["Rust".to_string(), "SQL".to_string()];
    let submitted = vec!["rust".to_string(), "Docker".to_string(), " sql ".to_string()];
    assert_eq!(merge_skills(&profile, &submitted), vec!["Rust", "SQL", "Docker"]);
}

#[test]
fn test_merge_skills_skips_blanks() {
    let profile = vec!["  ".to_string()];
    let submitted = vec!["Go".to_string(), "".to_string()];
    assert_eq!(merge_skills(&profile, &submitted), vec!["Go"]);
}

#[test]
fn test_submission_fields_from_raw() {
    let raw = fields(&[
        ("coverLetter", "  Dear team, I would like to apply.  "),
        ("skills", r#"["Rust","Tokio"]"#),
        ("selectedCVs", r#"["V_ABC123"]"#),
        ("contactInfo", r#"{"email":"a@b.se","phone":"070"}"#),
        (
            "references",
            r#"[{"name":"Eva Berg","company":"Acme"},{"providedAsDocument":true,"documentKey":"ref_doc_0"}]"#,
        ),
        (
            "workExperience",
            r#"[{"title":"Backend Engineer","startDate":"2021-01"}]"#,
        ),
    ]);

    let parsed = SubmissionFields::from_raw(&raw);
    assert_eq!(parsed.cover_letter, "Dear team, I would like to apply.");
    assert_eq!(parsed.skills, vec!["Rust", "Tokio"]);
    assert_eq!(parsed.selected_cv_ids, vec!["V_ABC123"]);
    assert_eq!(parsed.contact_info.email.as_deref(), Some("a@b.se"));
    assert_eq!(parsed.references.len(), 2);
    assert!(!parsed.references[0].provided_as_document);
    assert!(parsed.references[1].provided_as_document);
    assert_eq!(
        parsed.references[1].document_key.as_deref(),
        Some("ref_doc_0")
    );
    assert_eq!(
        parsed.work_experience[0].start_date.as_deref(),
        Some("2021-01")
    );
}

#[test]
fn test_submission_fields_tolerates_malformed_json() {
    let raw = fields(&[
        ("coverLetter", "Hello"),
        ("skills", "Rust"),
        ("selectedCVs", r#"["V_ABC123"]"#),
        ("references", "{broken"),
        ("workExperience", "[[["),
    ]);

    let parsed = SubmissionFields::from_raw(&raw);
    assert_eq!(parsed.skills, vec!["Rust"]);
    assert!(parsed.references.is_empty());
    assert!(parsed.work_experience.is_empty());
}

#[test]
fn test_submission_fields_missing_everything() {
    let parsed = SubmissionFields::from_raw(&HashMap::new());
    assert!(parsed.cover_letter.is_empty());
    assert!(parsed.skills.is_empty());
    assert!(parsed.selected_cv_ids.is_empty());
    assert!(parsed.contact_info.email.is_none());
}
