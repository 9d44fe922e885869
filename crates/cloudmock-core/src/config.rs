//! Configuration module
//!
//! This module provides the configuration structures for the HTTP server and the
//! upload pipeline. A `Config` is built once at process start and handed to the
//! storage and API layers explicitly.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_FIELD_NAME, DEFAULT_MAX_FILE_SIZE_BYTES,
    DEFAULT_PORT, DEFAULT_PUBLIC_BASE_URL, DEFAULT_UPLOAD_DIR,
};

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Upload pipeline configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Storage root; every accepted upload is written directly below it.
    pub upload_dir: PathBuf,
    /// Base address joined with the generated name to build `url`/`secure_url`.
    pub public_base_url: String,
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    /// Multipart field the file part is expected under.
    pub field_name: String,
    /// Mount a static file layer for the storage root at the public path.
    pub serve_uploads: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server: ServerConfig,
    upload: UploadConfig,
}

impl Config {
    pub fn new(server: ServerConfig, upload: UploadConfig) -> Self {
        Self { server, upload }
    }

    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let max_file_size_bytes = match lookup("MAX_FILE_SIZE_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be a valid number"))?,
            None => DEFAULT_MAX_FILE_SIZE_BYTES,
        };

        let upload = UploadConfig {
            upload_dir: PathBuf::from(
                lookup("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_file_size_bytes,
            allowed_content_types: parse_content_types(
                &lookup("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
            ),
            field_name: lookup("UPLOAD_FIELD_NAME")
                .unwrap_or_else(|| DEFAULT_FIELD_NAME.to_string()),
            serve_uploads: match lookup("SERVE_UPLOADS") {
                Some(raw) => parse_flag(&raw).ok_or_else(|| {
                    anyhow::anyhow!("SERVE_UPLOADS must be true/false, got '{}'", raw)
                })?,
                None => true,
            },
        };

        let config = Config { server, upload };
        config.validate()?;
        Ok(config)
    }

    /// Configuration with defaults for everything except the storage root and base URL.
    pub fn for_storage_root(upload_dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Config {
            server: ServerConfig {
                server_port: DEFAULT_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
            },
            upload: UploadConfig {
                upload_dir: upload_dir.into(),
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
                max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
                allowed_content_types: parse_content_types(DEFAULT_ALLOWED_CONTENT_TYPES),
                field_name: DEFAULT_FIELD_NAME.to_string(),
                serve_uploads: true,
            },
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES cannot be 0"));
        }

        if self.upload.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one media type"
            ));
        }

        let base = &self.upload.public_base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must be an http(s) URL, got '{}'",
                base
            ));
        }

        let field = &self.upload.field_name;
        if field.is_empty() || field.contains(['.', '/', '\\']) {
            // The field name is the leading segment of every generated file name.
            return Err(anyhow::anyhow!(
                "UPLOAD_FIELD_NAME must be non-empty and contain no '.', '/' or '\\'"
            ));
        }

        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload.upload_dir
    }

    pub fn public_base_url(&self) -> &str {
        &self.upload.public_base_url
    }

    /// Path component of the public base URL (e.g. `/uploads`), used to mount the static layer.
    pub fn public_path(&self) -> String {
        let without_scheme = self
            .upload
            .public_base_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.upload.public_base_url);
        match without_scheme.find('/') {
            Some(idx) => without_scheme[idx..].trim_end_matches('/').to_string(),
            None => String::new(),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.upload.max_file_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.upload.allowed_content_types
    }

    pub fn field_name(&self) -> &str {
        &self.upload.field_name
    }

    pub fn serve_uploads(&self) -> bool {
        self.upload.serve_uploads
    }

    pub fn with_max_file_size_bytes(mut self, max: u64) -> Self {
        self.upload.max_file_size_bytes = max;
        self
    }

    pub fn with_serve_uploads(mut self, serve: bool) -> Self {
        self.upload.serve_uploads = serve;
        self
    }
}

/// Boolean env flag: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_content_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.max_file_size_bytes(), 1024 * 1024);
        assert_eq!(config.field_name(), "file");
        assert_eq!(config.upload_dir(), Path::new("./uploads"));
        assert_eq!(config.public_base_url(), "http://localhost:8080/uploads");
        assert_eq!(
            config.allowed_content_types(),
            &["image/jpeg", "image/png", "image/jpg"]
        );
        assert!(config.serve_uploads());
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("MAX_FILE_SIZE_BYTES", "2048"),
            ("ALLOWED_CONTENT_TYPES", " IMAGE/PNG , image/webp ,"),
            ("PUBLIC_BASE_URL", "https://cdn.example.com/assets/"),
            ("SERVE_UPLOADS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.server_port(), 9000);
        assert_eq!(config.max_file_size_bytes(), 2048);
        assert_eq!(config.allowed_content_types(), &["image/png", "image/webp"]);
        assert_eq!(config.public_base_url(), "https://cdn.example.com/assets");
        assert_eq!(config.public_path(), "/assets");
        assert!(!config.serve_uploads());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn test_serve_uploads_flag() {
        let cases = [
            ("0", false),
            ("no", false),
            ("OFF", false),
            ("1", true),
            ("yes", true),
        ];
        for (raw, expected) in cases {
            let config = Config::from_lookup(lookup_from(&[("SERVE_UPLOADS", raw)])).unwrap();
            assert_eq!(config.serve_uploads(), expected, "SERVE_UPLOADS={}", raw);
        }
    }

    #[test]
    fn test_unparseable_serve_uploads_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("SERVE_UPLOADS", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SERVE_UPLOADS", "")])).is_err());
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("MAX_FILE_SIZE_BYTES", "0")])).is_err());
    }

    #[test]
    fn test_field_name_with_dot_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("UPLOAD_FIELD_NAME", "a.b")])).is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let result = Config::from_lookup(lookup_from(&[("ENVIRONMENT", "production")]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "prod"),
            ("CORS_ORIGINS", "https://app.example.com"),
        ]))
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_public_path_without_path_component() {
        let config = Config::for_storage_root("/tmp/x", "http://localhost:8080");
        assert_eq!(config.public_path(), "");
    }
}
