//! Test helpers: build the router over a temporary storage root.
//!
//! Run from workspace root: `cargo test -p cloudmock-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use cloudmock_api::setup::{initialize_app, routes};
use cloudmock_api::state::AppState;
use cloudmock_core::Config;
use cloudmock_storage::{Storage, STAGING_DIR};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const PUBLIC_BASE_URL: &str = "http://localhost:8080/uploads";

/// Upload path for a given account name.
pub fn upload_path(account: &str) -> String {
    format!("/v1_1/{}/image/upload", account)
}

/// Test application: server plus the storage root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Names of every entry in the storage root, staging files included.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = entries(&self.upload_dir)
            .into_iter()
            .filter(|name| name != STAGING_DIR)
            .collect();
        let staging = self.upload_dir.join(STAGING_DIR);
        if staging.is_dir() {
            names.extend(
                entries(&staging)
                    .into_iter()
                    .map(|name| format!("{}/{}", STAGING_DIR, name)),
            );
        }
        names.sort();
        names
    }
}

fn entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read upload dir")
        .map(|entry| {
            entry
                .expect("Failed to read dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config::for_storage_root(upload_dir, PUBLIC_BASE_URL)
}

/// Setup test app with the production wiring and a fresh storage root.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|config| config).await
}

/// Setup test app after adjusting the default test configuration.
pub async fn setup_test_app_with(adjust: impl FnOnce(Config) -> Config) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let upload_dir = temp_dir.path().join("uploads");
    let config = adjust(test_config(&upload_dir));

    let (_state, app) = initialize_app(config)
        .await
        .expect("Failed to initialize app");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Setup test app with an injected storage backend.
pub async fn setup_test_app_with_storage(storage: Arc<dyn Storage>) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let upload_dir = temp_dir.path().join("uploads");
    std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");
    let config = test_config(&upload_dir);

    let state = Arc::new(AppState::new(config.clone(), storage));
    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        _temp_dir: temp_dir,
    }
}
