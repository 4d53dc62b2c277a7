// src/companies/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::company_routes;
