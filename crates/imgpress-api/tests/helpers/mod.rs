//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p imgpress-api --test compress_test`.
//! Every app gets its own temporary upload and output directories.

#![allow(dead_code)]

pub mod codecs;
pub mod fixtures;
pub mod live;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use imgpress_api::setup::{build_state, routes};
use imgpress_api::AppState;
use imgpress_core::{BaseConfig, CompressionConfig, Config};
use imgpress_processing::{ImageCodec, StandardCodec};
use tempfile::TempDir;

pub const TEST_BASE_URL: &str = "http://localhost:3000";

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of the files currently in the upload holding area.
    pub fn upload_files(&self) -> Vec<String> {
        list_files(self.state.uploads.base_path())
    }

    /// Names of the files currently in the compressed-output area.
    pub fn compressed_files(&self) -> Vec<String> {
        list_files(self.state.compressed().base_path())
    }
}

pub struct TestAppBuilder {
    codec: Arc<dyn ImageCodec>,
    timeout: Duration,
    max_upload_size_bytes: usize,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        TestAppBuilder {
            codec: Arc::new(StandardCodec),
            timeout: Duration::from_secs(35),
            max_upload_size_bytes: 20 * 1024 * 1024,
        }
    }
}

impl TestAppBuilder {
    pub fn codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_upload_size_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_size_bytes = bytes;
        self
    }

    pub async fn build(self) -> TestApp {
        let (state, app, temp_dir) = self.build_router().await;
        let server =
            TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Serve the app on a real socket, for tests that need control over how the body arrives.
    pub async fn serve(self) -> live::LiveApp {
        let (state, app, temp_dir) = self.build_router().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        live::LiveApp {
            addr,
            state,
            _temp_dir: temp_dir,
        }
    }

    async fn build_router(self) -> (Arc<AppState>, axum::Router, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = test_config(temp_dir.path(), self.timeout, self.max_upload_size_bytes);

        let state = build_state(&config, self.codec)
            .await
            .expect("Failed to build state");
        let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
        (state, app, temp_dir)
    }
}

/// App with the production codec and default limits.
pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build().await
}

pub fn test_config(root: &Path, timeout: Duration, max_upload_size_bytes: usize) -> Config {
    Config::new(
        BaseConfig {
            server_port: 3000,
            environment: "test".to_string(),
            base_url: TEST_BASE_URL.to_string(),
            cors_origins: vec!["*".to_string()],
        },
        CompressionConfig {
            upload_dir: root.join("uploads"),
            compressed_dir: root.join("compressed"),
            timeout,
            max_upload_size_bytes,
            max_concurrent_compressions: 2,
        },
    )
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
