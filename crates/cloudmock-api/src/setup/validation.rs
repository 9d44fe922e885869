//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use cloudmock_core::Config;

/// Validate critical configuration values
///
/// Structural checks live on `Config::validate`; this adds the startup warnings
/// that do not prevent the server from running.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.serve_uploads() {
        tracing::warn!(
            "Serving uploads from the API process in production - consider a dedicated file server"
        );
    }

    if !config.public_base_url().starts_with("https://") && config.is_production() {
        tracing::warn!(
            public_base_url = %config.public_base_url(),
            "PUBLIC_BASE_URL is not https - secure_url will not be secure"
        );
    }

    Ok(())
}
