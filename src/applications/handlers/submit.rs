// src/applications/handlers/submit.rs
//! Application submission: multipart parsing, validation, file persistence,
//! and the transactional insert that keeps the job counter honest.

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::queries::fetch_application_details;
use crate::applications::models::{
    CvSnapshot, SubmissionFields, UploadedDocument,
};
use crate::applications::parse::merge_skills;
use crate::applications::status::INITIAL_STATUS;
use crate::applications::validators::SubmissionValidator;
use crate::auth::AuthedUser;
use crate::common::{
    generate_application_id, generate_attachment_id, generate_experience_id,
    generate_history_id, generate_reference_id, ApiError, AppState, Validator,
};
use crate::jobs::models::Job;
use crate::profile::handlers::load_profile;
use crate::profile::models::Cv;

const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
const TEXT_FIELDS: [&str; 7] = [
    "coverLetter",
    "skills",
    "selectedCVs",
    "contactInfo",
    "references",
    "workExperience",
    "userInfo",
];

/// Everything read out of the multipart body
struct ParsedBody {
    fields: SubmissionFields,
    /// Document uploads keyed by their multipart field name; references and
    /// work-experience entries point at these through `document_key`.
    documents: HashMap<String, UploadedDocument>,
    portfolio: Vec<UploadedDocument>,
    other: Vec<UploadedDocument>,
}

async fn read_multipart(multipart: &mut Multipart) -> Result<ParsedBody, ApiError> {
    let mut raw_fields: HashMap<String, String> = HashMap::new();
    let mut documents: HashMap<String, UploadedDocument> = HashMap::new();
    let mut portfolio = Vec::new();
    let mut other = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        let name = match field.name() {
            Some(n) => n.to_string(),
            None => continue,
        };

        if field.file_name().is_none() {
            let value = field
                .text()
                .await
                .map_err(|_| ApiError::BadRequest(format!("Unreadable field '{}'", name)))?;
            if TEXT_FIELDS.contains(&name.as_str()) {
                raw_fields.insert(name, value);
            }
            continue;
        }

        let original_name = field.file_name().unwrap_or("document").to_string();
        let declared_mime = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest(format!("Invalid file in field '{}'", name)))?;

        if data.len() > MAX_FILE_BYTES {
            return Err(ApiError::AttachmentError(format!(
                "File '{}' exceeds the 10 MB limit",
                original_name
            )));
        }
        if data.is_empty() {
            return Err(ApiError::AttachmentError(format!(
                "File '{}' is empty",
                original_name
            )));
        }

        let mime_type = infer::get(&data)
            .map(|kind| kind.mime_type().to_string())
            .or(declared_mime);

        let upload = UploadedDocument {
            field_name: name.clone(),
            original_name,
            bytes: data.to_vec(),
            mime_type,
        };

        match name.as_str() {
            "portfolio" => portfolio.push(upload),
            "attachment" => other.push(upload),
            _ => {
                if documents.insert(name.clone(), upload).is_some() {
                    return Err(ApiError::AttachmentError(format!(
                        "Duplicate document field '{}'",
                        name
                    )));
                }
            }
        }
    }

    Ok(ParsedBody {
        fields: SubmissionFields::from_raw(&raw_fields),
        documents,
        portfolio,
        other,
    })
}

/// Picks a stored filename extension from the original name, falling back to
/// the sniffed mime type.
fn storage_extension(original_name: &str, mime_type: Option<&str>) -> &'static str {
    let by_name = original_name
        .rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase());
    match by_name.as_deref() {
        Some("pdf") => "pdf",
        Some("png") => "png",
        Some("jpg") | Some("jpeg") => "jpg",
        Some("txt") => "txt",
        _ => match mime_type {
            Some("application/pdf") => "pdf",
            Some("image/png") => "png",
            Some("image/jpeg") => "jpg",
            Some("text/plain") => "txt",
            _ => "bin",
        },
    }
}

struct StoredFile {
    filename: String,
    path: PathBuf,
    original_name: String,
    size_bytes: i64,
    mime_type: Option<String>,
}

async fn store_upload(dir: &std::path::Path, upload: &UploadedDocument) -> Result<StoredFile, ApiError> {
    let filename = format!(
        "{}.{}",
        generate_attachment_id(),
        storage_extension(&upload.original_name, upload.mime_type.as_deref())
    );
    let path = dir.join(&filename);

    tokio::fs::write(&path, &upload.bytes).await.map_err(|e| {
        error!(error = %e, filename = %filename, "Failed to persist uploaded file");
        ApiError::InternalServer("Failed to store uploaded file".to_string())
    })?;

    Ok(StoredFile {
        filename,
        path,
        original_name: upload.original_name.clone(),
        size_bytes: upload.bytes.len() as i64,
        mime_type: upload.mime_type.clone(),
    })
}

/// Best-effort removal of files written before a failed database step.
/// Failures are logged, never propagated.
async fn cleanup_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(error = %e, path = %path.display(), "Compensating file cleanup failed");
        }
    }
}

/// POST /api/applications/job/:job_id - Submit an application
pub async fn apply_for_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if authed.role != "candidate" {
        return Err(ApiError::Forbidden(
            "Only candidates can apply for jobs".to_string(),
        ));
    }

    info!(user_id = %authed.id, job_id = %job_id, "Processing job application");

    // Files stay in memory until every validation has passed; nothing to
    // clean up when a check below rejects the request.
    let body = read_multipart(&mut multipart).await?;

    let validation_result = SubmissionValidator.validate(&body.fields);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            job_id = %job_id,
            errors = ?validation_result.errors,
            "Application submission validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::BadRequest("Job not found".to_string()))?;

    if job.status != "active" {
        return Err(ApiError::BadRequest(
            "This job is not accepting applications".to_string(),
        ));
    }
    if job.deadline_passed(Utc::now()) {
        return Err(ApiError::BadRequest(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM applications WHERE job_id = ? AND candidate_id = ?",
    )
    .bind(&job_id)
    .bind(&authed.id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if existing > 0 {
        return Err(ApiError::BadRequest(
            "You have already applied for this job".to_string(),
        ));
    }

    let profile = load_profile(&state.db, &authed.id)
        .await
        .map_err(|_| ApiError::BadRequest("Candidate profile could not be loaded".to_string()))?;

    // Selected CVs must come from the candidate's own list; an id that exists
    // for another candidate is just as invalid as an unknown one.
    let own_cvs = sqlx::query_as::<_, Cv>("SELECT * FROM cvs WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let mut cv_snapshots = Vec::new();
    for cv_id in &body.fields.selected_cv_ids {
        let cv = own_cvs
            .iter()
            .find(|cv| &cv.id == cv_id)
            .ok_or_else(|| {
                ApiError::BadRequest("Selected CV does not belong to your CV list".to_string())
            })?;
        cv_snapshots.push(CvSnapshot {
            cv_id: cv.id.clone(),
            filename: cv.filename.clone(),
            original_name: cv.original_name.clone(),
            size_bytes: cv.size_bytes,
            mime_type: cv.mime_type.clone(),
            uploaded_at: cv.uploaded_at.clone(),
        });
    }

    // Pair flagged entries to uploads by explicit document key
    let mut claimed_keys: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for entry in body.fields.references.iter().filter(|e| e.provided_as_document) {
        let key = entry.document_key.as_deref().unwrap_or("");
        if !body.documents.contains_key(key) {
            return Err(ApiError::AttachmentError(format!(
                "No uploaded document matched key '{}'",
                key
            )));
        }
        claimed_keys.insert(key);
    }
    for entry in body.fields.work_experience.iter().filter(|e| e.provided_as_document) {
        let key = entry.document_key.as_deref().unwrap_or("");
        if !body.documents.contains_key(key) {
            return Err(ApiError::AttachmentError(format!(
                "No uploaded document matched key '{}'",
                key
            )));
        }
        claimed_keys.insert(key);
    }
    for key in body.documents.keys() {
        if !claimed_keys.contains(key.as_str()) {
            return Err(ApiError::AttachmentError(format!(
                "Uploaded document '{}' does not match any entry",
                key
            )));
        }
    }

    let skills = merge_skills(&profile.skill_list(), &body.fields.skills);

    // Profile contact fields are defaults; explicit submission values win
    let contact = &body.fields.contact_info;
    let contact_email = contact.email.clone().unwrap_or_else(|| authed.email.clone());
    let contact_phone = contact.phone.clone().or_else(|| profile.phone.clone());
    let contact_location = contact.location.clone().or_else(|| profile.location.clone());

    // Validation is done - now write files, then run one transaction
    let mut written_paths: Vec<PathBuf> = Vec::new();
    let mut stored_documents: HashMap<String, StoredFile> = HashMap::new();
    for (key, upload) in &body.documents {
        let stored = match store_upload(&state.applications_dir, upload).await {
            Ok(s) => s,
            Err(e) => {
                cleanup_files(&written_paths).await;
                return Err(e);
            }
        };
        written_paths.push(stored.path.clone());
        stored_documents.insert(key.clone(), stored);
    }
    let mut stored_portfolio = Vec::new();
    for upload in &body.portfolio {
        let stored = match store_upload(&state.applications_dir, upload).await {
            Ok(s) => s,
            Err(e) => {
                cleanup_files(&written_paths).await;
                return Err(e);
            }
        };
        written_paths.push(stored.path.clone());
        stored_portfolio.push(stored);
    }
    let mut stored_other = Vec::new();
    for upload in &body.other {
        let stored = match store_upload(&state.applications_dir, upload).await {
            Ok(s) => s,
            Err(e) => {
                cleanup_files(&written_paths).await;
                return Err(e);
            }
        };
        written_paths.push(stored.path.clone());
        stored_other.push(stored);
    }

    let application_id = generate_application_id();
    match insert_application(
        &state,
        &authed,
        &job,
        &application_id,
        &body,
        &cv_snapshots,
        &skills,
        &contact_email,
        contact_phone.as_deref(),
        contact_location.as_deref(),
        &stored_documents,
        &stored_portfolio,
        &stored_other,
    )
    .await
    {
        Ok(()) => {}
        Err(e) => {
            cleanup_files(&written_paths).await;
            return Err(e);
        }
    }

    info!(
        user_id = %authed.id,
        application_id = %application_id,
        job_id = %job_id,
        "Application created"
    );

    let details = fetch_application_details(&state.db, &application_id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

#[allow(clippy::too_many_arguments)]
async fn insert_application(
    state: &AppState,
    authed: &AuthedUser,
    job: &Job,
    application_id: &str,
    body: &ParsedBody,
    cv_snapshots: &[CvSnapshot],
    skills: &[String],
    contact_email: &str,
    contact_phone: Option<&str>,
    contact_location: Option<&str>,
    stored_documents: &HashMap<String, StoredFile>,
    stored_portfolio: &[StoredFile],
    stored_other: &[StoredFile],
) -> Result<(), ApiError> {
    let skills_json = serde_json::to_string(skills)
        .map_err(|e| ApiError::InternalServer(format!("Failed to encode skills: {}", e)))?;
    let selected_cvs_json = serde_json::to_string(cv_snapshots)
        .map_err(|e| ApiError::InternalServer(format!("Failed to encode CV list: {}", e)))?;

    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query(
        r#"
        INSERT INTO applications (id, job_id, candidate_id, cover_letter, skills, selected_cvs,
                                  contact_email, contact_phone, contact_location, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(application_id)
    .bind(&job.id)
    .bind(&authed.id)
    .bind(&body.fields.cover_letter)
    .bind(&skills_json)
    .bind(&selected_cvs_json)
    .bind(contact_email)
    .bind(contact_phone)
    .bind(contact_location)
    .bind(INITIAL_STATUS)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    for (position, entry) in body.fields.references.iter().enumerate() {
        let document = entry
            .document_key
            .as_deref()
            .and_then(|key| stored_documents.get(key))
            .filter(|_| entry.provided_as_document);

        sqlx::query(
            r#"
            INSERT INTO application_references
                (id, application_id, position, provided_as_document, name, company, email,
                 phone, relationship, document_filename, document_original_name,
                 document_size_bytes, document_mime_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(generate_reference_id())
        .bind(application_id)
        .bind(position as i64)
        .bind(entry.provided_as_document as i64)
        .bind(entry.name.as_deref())
        .bind(entry.company.as_deref())
        .bind(entry.email.as_deref())
        .bind(entry.phone.as_deref())
        .bind(entry.relationship.as_deref())
        .bind(document.map(|d| d.filename.as_str()))
        .bind(document.map(|d| d.original_name.as_str()))
        .bind(document.map(|d| d.size_bytes))
        .bind(document.and_then(|d| d.mime_type.as_deref()))
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        if let Some(doc) = document {
            insert_attachment(&mut tx, application_id, "reference", doc).await?;
        }
    }

    for (position, entry) in body.fields.work_experience.iter().enumerate() {
        let document = entry
            .document_key
            .as_deref()
            .and_then(|key| stored_documents.get(key))
            .filter(|_| entry.provided_as_document);

        sqlx::query(
            r#"
            INSERT INTO application_work_experience
                (id, application_id, position, provided_as_document, title, company,
                 start_date, end_date, description, document_filename,
                 document_original_name, document_size_bytes, document_mime_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(generate_experience_id())
        .bind(application_id)
        .bind(position as i64)
        .bind(entry.provided_as_document as i64)
        .bind(entry.title.as_deref())
        .bind(entry.company.as_deref())
        .bind(entry.start_date.as_deref())
        .bind(entry.end_date.as_deref())
        .bind(entry.description.as_deref())
        .bind(document.map(|d| d.filename.as_str()))
        .bind(document.map(|d| d.original_name.as_str()))
        .bind(document.map(|d| d.size_bytes))
        .bind(document.and_then(|d| d.mime_type.as_deref()))
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        if let Some(doc) = document {
            insert_attachment(&mut tx, application_id, "experience", doc).await?;
        }
    }

    for stored in stored_portfolio {
        insert_attachment(&mut tx, application_id, "portfolio", stored).await?;
    }
    for stored in stored_other {
        insert_attachment(&mut tx, application_id, "other", stored).await?;
    }

    sqlx::query(
        r#"
        INSERT INTO application_status_history (id, application_id, status, changed_by, message)
        VALUES (?, ?, ?, ?, 'Application submitted')
        "#,
    )
    .bind(generate_history_id())
    .bind(application_id)
    .bind(INITIAL_STATUS)
    .bind(&authed.id)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    // Counter moves with the insert or not at all
    sqlx::query("UPDATE jobs SET application_count = application_count + 1, updated_at = datetime('now') WHERE id = ?")
        .bind(&job.id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    Ok(())
}

async fn insert_attachment(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    application_id: &str,
    kind: &str,
    stored: &StoredFile,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO application_attachments
            (id, application_id, kind, filename, original_name, size_bytes, mime_type)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(generate_attachment_id())
    .bind(application_id)
    .bind(kind)
    .bind(&stored.filename)
    .bind(&stored.original_name)
    .bind(stored.size_bytes)
    .bind(stored.mime_type.as_deref())
    .execute(&mut **tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::storage_extension;

    #[test]
    fn test_storage_extension_prefers_filename() {
        assert_eq!(storage_extension("letter.PDF", None), "pdf");
        assert_eq!(storage_extension("photo.jpeg", None), "jpg");
    }

    #[test]
    fn test_storage_extension_falls_back_to_mime() {
        assert_eq!(
            storage_extension("upload", Some("application/pdf")),
            "pdf"
        );
        assert_eq!(storage_extension("upload.xyz", Some("image/png")), "png");
        assert_eq!(storage_extension("upload", None), "bin");
    }
}
