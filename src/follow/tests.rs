// src/follow/tests.rs

use super::handlers::counter_table;
use super::models::FOLLOW_TARGET_TYPES;

#[test]
fn test_target_types_map_to_tables() {
    assert_eq!(counter_table("user"), "users");
    assert_eq!(counter_table("company"), "companies");
    assert_eq!(counter_table("organization"), "organizations");
}

#[test]
fn test_known_target_types() {
    assert!(FOLLOW_TARGET_TYPES.contains(&"user"));
    assert!(FOLLOW_TARGET_TYPES.contains(&"company"));
    assert!(FOLLOW_TARGET_TYPES.contains(&"organization"));
    assert!(!FOLLOW_TARGET_TYPES.contains(&"job"));
}
