use crate::error::{CoreError, Result};

/// Maximum length accepted for app and component names.
const MAX_NAME_LEN: usize = 64;

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validates an app or component name.
///
/// Names become part of storage keys (`app_id/name`) and hook environments, so
/// they are limited to ASCII alphanumerics plus `.`, `-` and `_`.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(CoreError::invalid_name(name));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !valid || name.starts_with('.') {
        return Err(CoreError::invalid_name(name));
    }
    Ok(())
}
