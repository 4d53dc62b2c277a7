// Helper functions for safe logging and serialization

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Serializes a JSON-string column to an array for API responses
pub fn serialize_string_list<S>(raw: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match raw {
        Some(json) => {
            let values: Vec<String> = serde_json::from_str(json).unwrap_or_else(|_| Vec::new());
            values.serialize(serializer)
        }
        None => Vec::<String>::new().serialize(serializer),
    }
}

/// Deserializes an array into a JSON string for database storage
pub fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let json = serde_json::to_string(&values).map_err(serde::de::Error::custom)?;
    Ok(Some(json))
}

/// Rejects filenames that could escape the upload directories
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("candidate@example.com"), "c***@example.com");
    }

    #[test]
    fn test_safe_email_log_handles_garbage() {
        assert_eq!(safe_email_log("ab"), "***@***.***");
        assert_eq!(safe_email_log("no-at-sign"), "***@***.***");
    }

    #[test]
    fn test_is_safe_filename() {
        assert!(is_safe_filename("V_K7NP3X.pdf"));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.pdf"));
        assert!(!is_safe_filename(".hidden"));
        assert!(!is_safe_filename(""));
    }
}
