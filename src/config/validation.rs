//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject a missing or unusable mirror list location
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("mirrors.list_url is required and points to the mirror list file")]
    MissingMirrorList,

    #[error("mirrors.list_url is not a valid URL: {0}")]
    InvalidMirrorList(String),

    #[error("mirrors.list_url scheme `{0}` is not supported (use http, https or file)")]
    UnsupportedScheme(String),

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(
        "timeouts.request_secs ({request}) must exceed mirrors.fetch_timeout_secs ({fetch}) \
         plus race.timeout_secs ({race})"
    )]
    RequestTimeoutTooShort { request: u64, fetch: u64, race: u64 },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let list_url = config.mirrors.list_url.trim();
    if list_url.is_empty() {
        errors.push(ValidationError::MissingMirrorList);
    } else {
        match Url::parse(list_url) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https" | "file") {
                    errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
                }
            }
            Err(e) => errors.push(ValidationError::InvalidMirrorList(e.to_string())),
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let non_zero = [
        ("mirrors.fetch_timeout_secs", config.mirrors.fetch_timeout_secs),
        ("race.timeout_secs", config.race.timeout_secs),
        ("race.connect_timeout_secs", config.race.connect_timeout_secs),
        ("race.max_in_flight_probes", config.race.max_in_flight_probes as u64),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    // A request spends up to the list fetch timeout and then the race deadline
    // before it resolves; the outer request timeout must never fire first.
    let resolution_secs = config
        .mirrors
        .fetch_timeout_secs
        .saturating_add(config.race.timeout_secs);
    if config.timeouts.request_secs <= resolution_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            fetch: config.mirrors.fetch_timeout_secs,
            race: config.race.timeout_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.mirrors.list_url = "https://example.org/mirrors.txt".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_missing_list_url_rejected() {
        let errors = validate_config(&ServiceConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingMirrorList]);
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = valid();
        config.mirrors.list_url = "ftp://example.org/list".into();
        config.listener.bind_address = "not-an-address".into();
        config.race.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::UnsupportedScheme("ftp".into())));
        assert!(errors.contains(&ValidationError::Zero("race.timeout_secs")));
    }

    #[test]
    fn test_request_timeout_must_cover_race() {
        let mut config = valid();
        config.race.timeout_secs = 20;
        config.timeouts.request_secs = 10;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RequestTimeoutTooShort { request: 10, fetch: 5, race: 20 }]
        );
    }

    #[test]
    fn test_request_timeout_equal_to_resolution_rejected() {
        let mut config = valid();
        config.mirrors.fetch_timeout_secs = 5;
        config.race.timeout_secs = 10;

        config.timeouts.request_secs = 10;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeoutTooShort { request: 10, fetch: 5, race: 10 }]
        );

        config.timeouts.request_secs = 15;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeoutTooShort { request: 15, fetch: 5, race: 10 }]
        );

        config.timeouts.request_secs = 16;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_file_list_accepted() {
        let mut config = valid();
        config.mirrors.list_url = "file:///etc/mirror-redirect/mirrors.txt".into();
        assert!(validate_config(&config).is_ok());
    }
}
