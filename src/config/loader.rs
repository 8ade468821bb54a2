//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::interpolate::Interpolator;
use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::error::RouterError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("variable expansion failed: {0}")]
    Variable(#[from] RouterError),

    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, interpolate and validate configuration from a TOML file.
pub fn load_config(path: &Path, interp: &Interpolator) -> Result<RouterConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    parse_config(&raw, interp)
}

/// Interpolate and validate configuration from raw TOML text.
pub fn parse_config(raw: &str, interp: &Interpolator) -> Result<RouterConfig, ConfigError> {
    let expanded = interp.expand(raw)?;
    let config: RouterConfig = toml::from_str(&expanded)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTNAME_ROUTE: &str = r#"
        [[routes]]
        id = "www-https-public"
        entrypoint = "websecure"
        host = "${SUBDOMAIN}.${PARENT_DNS_DOMAIN}"
        service = "www"

        [[services]]
        name = "www"
        address = "127.0.0.1:8080"
    "#;

    #[test]
    fn interpolates_before_parsing() {
        let interp = Interpolator::default()
            .with_var("PARENT_DNS_DOMAIN", "example.com")
            .with_hub_defaults();
        let config = parse_config(HOSTNAME_ROUTE, &interp).unwrap();
        assert_eq!(config.routes[0].host.as_deref(), Some("www.example.com"));
    }

    #[test]
    fn missing_parent_domain_aborts_load() {
        let interp = Interpolator::default().with_hub_defaults();
        let err = parse_config(HOSTNAME_ROUTE, &interp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Variable(RouterError::MissingVariable(name)) if name == "PARENT_DNS_DOMAIN"
        ));
    }

    #[test]
    fn invalid_references_fail_validation() {
        let raw = r#"
            [[routes]]
            id = "r1"
            entrypoint = "web"
            host = "www.example.com"
            middlewares = ["nope"]
            service = "ghost"
        "#;
        let err = parse_config(raw, &Interpolator::default()).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other}"),
        }
    }
}
