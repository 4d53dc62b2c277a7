// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created idempotently on every startup. The full drop only
/// happens when RESET_DB=true to avoid data loss on restarts.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    } else {
        info!("ℹ️  Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_core_tables(pool).await?;
    create_owner_tables(pool).await?;
    create_job_tables(pool).await?;
    create_application_tables(pool).await?;
    create_social_tables(pool).await?;
    create_system_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let tables = [
        "application_status_history",
        "application_references",
        "application_work_experience",
        "application_attachments",
        "applications",
        "cvs",
        "posts",
        "follows",
        "tenders",
        "jobs",
        "profiles",
        "organizations",
        "companies",
        "settings",
        "users",
    ];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Users, candidate profiles, and CV documents
async fn create_core_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            role TEXT NOT NULL DEFAULT 'candidate',
            avatar_path TEXT,
            follower_count INTEGER NOT NULL DEFAULT 0,
            following_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Single source of truth for professional data: skills and role-specific
    // detail live here, never duplicated onto users.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY,
            phone TEXT,
            location TEXT,
            website TEXT,
            summary TEXT,
            skills TEXT,
            role_specific TEXT,
            updated_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cvs (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            filename TEXT NOT NULL,
            original_name TEXT,
            size_bytes INTEGER NOT NULL DEFAULT 0,
            mime_type TEXT,
            label TEXT,
            uploaded_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Companies and organizations (job/tender owners)
async fn create_owner_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            website TEXT,
            industry TEXT,
            logo_path TEXT,
            follower_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            website TEXT,
            logo_path TEXT,
            banner_path TEXT,
            follower_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Jobs and tenders - both carry one explicit owner
async fn create_job_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            owner_type TEXT NOT NULL CHECK (owner_type IN ('company', 'organization')),
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            location TEXT,
            employment_type TEXT,
            salary_min INTEGER,
            salary_max INTEGER,
            status TEXT NOT NULL DEFAULT 'draft',
            application_deadline TEXT,
            application_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tenders (
            id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            budget_min INTEGER,
            budget_max INTEGER,
            deadline TEXT,
            status TEXT NOT NULL DEFAULT 'open',
            moderated INTEGER NOT NULL DEFAULT 0,
            moderation_reason TEXT,
            created_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (company_id) REFERENCES companies(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Application workflow tables
async fn create_application_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            id TEXT PRIMARY KEY,
            job_id TEXT NOT NULL,
            candidate_id TEXT NOT NULL,
            cover_letter TEXT NOT NULL,
            skills TEXT,
            selected_cvs TEXT NOT NULL,
            contact_email TEXT,
            contact_phone TEXT,
            contact_location TEXT,
            status TEXT NOT NULL DEFAULT 'applied',
            applied_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now')),
            UNIQUE (job_id, candidate_id),
            FOREIGN KEY (job_id) REFERENCES jobs(id),
            FOREIGN KEY (candidate_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only audit log; applications.status always mirrors the latest row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_status_history (
            id TEXT PRIMARY KEY,
            application_id TEXT NOT NULL,
            status TEXT NOT NULL,
            changed_by TEXT NOT NULL,
            message TEXT,
            interview_details TEXT,
            changed_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (application_id) REFERENCES applications(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Entry is EITHER a structured form OR an uploaded document:
    // document columns are set iff provided_as_document = 1
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_references (
            id TEXT PRIMARY KEY,
            application_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            provided_as_document INTEGER NOT NULL DEFAULT 0,
            name TEXT,
            company TEXT,
            email TEXT,
            phone TEXT,
            relationship TEXT,
            document_filename TEXT,
            document_original_name TEXT,
            document_size_bytes INTEGER,
            document_mime_type TEXT,
            CHECK ((provided_as_document = 1) = (document_filename IS NOT NULL)),
            FOREIGN KEY (application_id) REFERENCES applications(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_work_experience (
            id TEXT PRIMARY KEY,
            application_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            provided_as_document INTEGER NOT NULL DEFAULT 0,
            title TEXT,
            company TEXT,
            start_date TEXT,
            end_date TEXT,
            description TEXT,
            document_filename TEXT,
            document_original_name TEXT,
            document_size_bytes INTEGER,
            document_mime_type TEXT,
            CHECK ((provided_as_document = 1) = (document_filename IS NOT NULL)),
            FOREIGN KEY (application_id) REFERENCES applications(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_attachments (
            id TEXT PRIMARY KEY,
            application_id TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('reference', 'experience', 'portfolio', 'other')),
            filename TEXT NOT NULL,
            original_name TEXT,
            size_bytes INTEGER NOT NULL DEFAULT 0,
            mime_type TEXT,
            uploaded_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (application_id) REFERENCES applications(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Follow relations and posts
async fn create_social_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS follows (
            id TEXT PRIMARY KEY,
            follower_id TEXT NOT NULL,
            target_type TEXT NOT NULL CHECK (target_type IN ('user', 'company', 'organization')),
            target_id TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'accepted',
            created_at TEXT DEFAULT (datetime('now')),
            UNIQUE (follower_id, target_type, target_id),
            FOREIGN KEY (follower_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            author_id TEXT NOT NULL,
            content TEXT NOT NULL,
            visibility TEXT NOT NULL DEFAULT 'public',
            shared_post_id TEXT,
            share_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (author_id) REFERENCES users(id),
            FOREIGN KEY (shared_post_id) REFERENCES posts(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// System key/value settings
async fn create_system_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_applications_job ON applications(job_id)",
        "CREATE INDEX IF NOT EXISTS idx_applications_candidate ON applications(candidate_id)",
        "CREATE INDEX IF NOT EXISTS idx_status_history_application ON application_status_history(application_id, changed_at)",
        "CREATE INDEX IF NOT EXISTS idx_references_application ON application_references(application_id)",
        "CREATE INDEX IF NOT EXISTS idx_experience_application ON application_work_experience(application_id)",
        "CREATE INDEX IF NOT EXISTS idx_attachments_application ON application_attachments(application_id)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_owner ON jobs(owner_type, owner_id)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status)",
        "CREATE INDEX IF NOT EXISTS idx_cvs_user ON cvs(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_follows_follower ON follows(follower_id)",
        "CREATE INDEX IF NOT EXISTS idx_follows_target ON follows(target_type, target_id)",
        "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_tenders_company ON tenders(company_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}
