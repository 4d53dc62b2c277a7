// src/files/mod.rs

pub mod handlers;
pub mod routes;

pub use routes::file_routes;
