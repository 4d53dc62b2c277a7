// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::common::dev_mode::DevModeConfig;
use crate::services::SettingsService;

/// Application state containing database pool, upload directories, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub cv_dir: PathBuf,
    pub applications_dir: PathBuf,
    pub org_assets_dir: PathBuf,
    pub jwt_secret: String,
    pub admin_emails: HashSet<String>,
    pub dev_mode: DevModeConfig,
    pub settings_service: Arc<SettingsService>,
}
