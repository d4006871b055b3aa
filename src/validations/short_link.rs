use url::Url;
use validator::ValidationError;

pub const MAX_ALIAS_LENGTH: usize = 64;
pub const MAX_URL_LENGTH: usize = 2048;

/// Validates that a URL string is absolute, uses http/https and is at most
/// `MAX_URL_LENGTH` characters
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    if url_str.chars().count() > MAX_URL_LENGTH {
        let mut err = ValidationError::new("url_length");
        err.message = Some(format!("URL must be at most {} characters", MAX_URL_LENGTH).into());
        return Err(err);
    }

    match Url::parse(url_str) {
        Ok(url) => {
            // Only accept HTTP and HTTPS URLs
            if url.scheme() != "http" && url.scheme() != "https" {
                let mut err = ValidationError::new("url_scheme");
                err.message = Some("URL must start with http:// or https://".into());
                return Err(err);
            }

            if url.host_str().map_or(true, str::is_empty) {
                let mut err = ValidationError::new("url_host");
                err.message = Some("URL must include a host".into());
                return Err(err);
            }

            Ok(())
        }
        Err(_) => {
            let mut err = ValidationError::new("url_format");
            err.message =
                Some("Please enter a valid URL (must start with http:// or https://)".into());
            Err(err)
        }
    }
}

/// Validates that a custom alias is 1-64 URL-safe characters:
/// letters, digits, hyphens and underscores
pub fn validate_custom_alias(alias: &str) -> Result<(), ValidationError> {
    if alias.is_empty() || alias.chars().count() > MAX_ALIAS_LENGTH {
        let mut err = ValidationError::new("custom_alias_length");
        err.message = Some(
            format!(
                "Custom alias must be between 1 and {} characters",
                MAX_ALIAS_LENGTH
            )
            .into(),
        );
        return Err(err);
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("custom_alias_charset");
        err.message = Some(
            "Custom alias can only contain letters, digits, hyphens, and underscores".into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        // Valid URLs
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?query=value").is_ok());

        // Invalid URLs
        assert!(validate_url("not-a-url").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("https://").is_err());
        assert!(validate_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_validate_url_length() {
        let base = "https://example.com/";
        let at_limit = format!("{}{}", base, "a".repeat(MAX_URL_LENGTH - base.len()));
        assert!(validate_url(&at_limit).is_ok());

        let over = format!("{}a", at_limit);
        assert_eq!(validate_url(&over).unwrap_err().code, "url_length");
    }

    #[test]
    fn test_validate_custom_alias() {
        // Valid aliases
        assert!(validate_custom_alias("Promo").is_ok());
        assert!(validate_custom_alias("valid_alias-123").is_ok());

        // Invalid aliases
        let too_long = "a".repeat(MAX_ALIAS_LENGTH + 1);
        assert!(validate_custom_alias(&too_long).is_err());
        assert!(validate_custom_alias("").is_err());
        assert!(validate_custom_alias("invalid/alias").is_err());
        assert!(validate_custom_alias("café").is_err());
    }

    #[test]
    fn test_messages_are_user_facing() {
        let err = validate_url("not-a-url").unwrap_err();
        assert_eq!(err.code, "url_format");
        assert!(err.message.unwrap().contains("http://"));
    }
}
