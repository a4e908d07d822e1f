//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the segment endpoint URL
//! - Validate value ranges (timeouts > 0, attempts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{SegmentMode, ServiceConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("segment.endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("segment.base_delay_ms ({base}) exceeds segment.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("observability.log_format: unknown format '{0}' (expected pretty or json)")]
    UnknownLogFormat(String),

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingAdminKey,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::MustBePositive("timeouts.request_secs"));
    }

    let segment = &config.segment;
    if segment.mode == SegmentMode::Remote {
        match url::Url::parse(&segment.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                url.scheme()
            ))),
            Err(e) => errors.push(ValidationError::InvalidEndpoint(e.to_string())),
        }
    }
    if segment.timeout_ms == 0 {
        errors.push(ValidationError::MustBePositive("segment.timeout_ms"));
    }
    if segment.max_attempts == 0 {
        errors.push(ValidationError::MustBePositive("segment.max_attempts"));
    }
    if segment.base_delay_ms > segment.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: segment.base_delay_ms,
            max: segment.max_delay_ms,
        });
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::UnknownLogFormat(observability.log_format.clone()));
    }
    if observability.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &observability.metrics_address);
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingAdminKey);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::MustBePositive("security.max_body_size"));
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
