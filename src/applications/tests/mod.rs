// src/applications/tests/mod.rs

mod parse_tests;
mod status_tests;
mod validators_tests;
