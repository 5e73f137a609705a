//! Environment variable parsing utilities
//!
//! Safe parsing of environment variables with defaults, so callers never
//! need to `unwrap()` on configuration input.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_with_default("PORT", 8080);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse an environment variable, returning an error naming the key
///
/// # Example
/// ```ignore
/// let database_url = parse_env_required::<String>("DATABASE_URL")?;
/// ```
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    std::env::var(key)
        .map_err(|_| format!("Environment variable {} not found", key))?
        .parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default_falls_back() {
        std::env::remove_var("DB_POOL_TEST_VALUE");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_VALUE", 42u32), 42);

        std::env::set_var("DB_POOL_TEST_VALUE", "not-a-number");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_VALUE", 42u32), 42);

        std::env::set_var("DB_POOL_TEST_VALUE", "7");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_VALUE", 42u32), 7);
        std::env::remove_var("DB_POOL_TEST_VALUE");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_required_reports_key() {
        std::env::remove_var("DB_POOL_TEST_REQUIRED");
        let err = parse_env_required::<String>("DB_POOL_TEST_REQUIRED").unwrap_err();
        assert!(err.contains("DB_POOL_TEST_REQUIRED"));
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_optional() {
        std::env::set_var("DB_POOL_TEST_OPTIONAL", "8080");
        assert_eq!(parse_env_optional::<u16>("DB_POOL_TEST_OPTIONAL"), Some(8080));
        std::env::remove_var("DB_POOL_TEST_OPTIONAL");
        assert_eq!(parse_env_optional::<u16>("DB_POOL_TEST_OPTIONAL"), None);
    }
}
