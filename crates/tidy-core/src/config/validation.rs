//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_log(config)?;
    validate_github(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_log(config: &Config) -> Result<()> {
    if config.log.style.trim().is_empty() {
        return Err(invalid("log.style", "style cannot be empty"));
    }

    if config.log.unreleased_title.trim().is_empty() {
        return Err(invalid("log.unreleased_title", "title cannot be empty"));
    }

    if let Some(pattern) = &config.log.tag_match {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(invalid("log.tag_match", &format!("invalid glob: {e}")));
        }
    }

    Ok(())
}

fn validate_github(config: &Config) -> Result<()> {
    if config.github.remote.is_empty() {
        return Err(invalid("github.remote", "remote cannot be empty"));
    }

    if !config.github.api_url.starts_with("http") {
        return Err(invalid("github.api_url", "must be an http(s) URL"));
    }

    if !config.github.pr_token.starts_with(':') {
        return Err(invalid(
            "github.pr_token",
            "must start with ':' so it cannot collide with a revision",
        ));
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::TidyError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_glob() {
        let mut config = Config::default();
        config.log.tag_match = Some("v[".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_api_url() {
        let mut config = Config::default();
        config.github.api_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_pr_token() {
        let mut config = Config::default();
        config.github.pr_token = "github/pr".to_string();
        assert!(validate_config(&config).is_err());
    }
}
