// src/admin/handlers/mod.rs

pub mod reports;
pub mod settings;
pub mod tenders;
pub mod users;

use crate::auth::AuthedUser;
use crate::common::ApiError;

pub(crate) fn require_admin(authed: &AuthedUser) -> Result<(), ApiError> {
    if authed.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }
}

pub use reports::platform_report;
pub use settings::{get_settings, update_setting};
pub use tenders::{create_tender, list_tenders, moderate_tender};
pub use users::list_users;
