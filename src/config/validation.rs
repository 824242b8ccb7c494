//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, poll < timeout)
//! - Check URLs actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: DeployerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::DeployerConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &DeployerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.rpc.rpc_url.parse::<url::Url>() {
        errors.push(err("rpc.rpc_url", format!("not a valid URL: {}", e)));
    }
    for (i, u) in config.rpc.failover_urls.iter().enumerate() {
        if u.parse::<url::Url>().is_err() {
            errors.push(err(
                "rpc.failover_urls",
                format!("entry {} is not a valid URL", i),
            ));
        }
    }
    if config.rpc.chain_id == 0 {
        errors.push(err("rpc.chain_id", "must be nonzero"));
    }
    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(err("rpc.rpc_timeout_secs", "must be greater than zero"));
    }

    if config.confirmation.poll_interval_secs == 0 {
        errors.push(err(
            "confirmation.poll_interval_secs",
            "must be greater than zero",
        ));
    }
    if config.confirmation.timeout_secs <= config.confirmation.poll_interval_secs {
        errors.push(err(
            "confirmation.timeout_secs",
            "must exceed the poll interval",
        ));
    }

    if config.gas.gas_price_multiplier < 1.0 {
        errors.push(err(
            "gas.gas_price_multiplier",
            "must be at least 1.0 (lowering the node's price gets transactions stuck)",
        ));
    }
    if config.gas.max_gas_price_gwei == 0 {
        errors.push(err("gas.max_gas_price_gwei", "must be greater than zero"));
    }
    if config.gas.gas_limit == Some(0) {
        errors.push(err("gas.gas_limit", "must be greater than zero when set"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
