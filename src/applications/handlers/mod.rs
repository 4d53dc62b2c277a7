// src/applications/handlers/mod.rs

pub mod queries;
pub mod status;
pub mod submit;

pub use queries::{get_application, job_applications, my_applications};
pub use status::{company_response, update_status, withdraw_application};
pub use submit::apply_for_job;
