// src/applications/mod.rs

pub mod handlers;
pub mod models;
pub mod parse;
pub mod routes;
pub mod status;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::application_routes;
