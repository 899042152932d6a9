//! Test helpers: build AppState and router over in-memory collaborators.
//!
//! The app runs with the in-memory video store, local storage under a temp dir,
//! a manual clock and fake media tools, so no database, network or ffmpeg is needed.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use axum_test::TestServer;
use chrono::Duration;
use fakes::{CountingIntrospector, CountingRemuxer, RejectingStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtValidator;
use tubely_api::services::upload::{UploadLimits, VideoUploadService};
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::{AppConfig, Clock, Config, ManualClock, StorageBackend, VideoRecord};
use tubely_db::{InMemoryVideoStore, VideoStore};
use tubely_processing::StreamInfo;
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_BUCKET: &str = "local";
pub const MEDIA_BASE_URL: &str = "http://localhost/media";

/// Test application: server plus handles on every collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<dyn VideoStore>,
    pub clock: Arc<ManualClock>,
    pub introspector: Arc<CountingIntrospector>,
    pub remuxer: Arc<CountingRemuxer>,
    pub jwt: JwtValidator,
    pub upload_dir: TempDir,
    pub _storage_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt
            .issue(user_id, Duration::hours(1))
            .expect("Failed to issue token")
    }

    pub fn bearer(&self, user_id: Uuid) -> String {
        format!("Bearer {}", self.token_for(user_id))
    }

    /// Insert a fresh record owned by `user_id`.
    pub async fn create_video(&self, user_id: Uuid) -> VideoRecord {
        let record = VideoRecord::new(user_id, "Boot.dev beats", "a test video");
        self.store
            .create_video(&record)
            .await
            .expect("Failed to create video record");
        record
    }

    pub async fn reload(&self, id: Uuid) -> VideoRecord {
        self.store
            .get_video(id)
            .await
            .expect("Failed to load video")
            .expect("Video missing")
    }

    pub fn upload_dir_entries(&self) -> Vec<PathBuf> {
        fixtures::dir_entries(self.upload_dir.path())
    }
}

/// Options for building a test app.
pub struct TestAppOptions {
    pub stream: StreamInfo,
    pub introspect_fails: bool,
    pub remux_fails: bool,
    pub placement_fails: bool,
    pub store: Option<Arc<dyn VideoStore>>,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            stream: StreamInfo {
                width: 1920,
                height: 1080,
            },
            introspect_fails: false,
            remux_fails: false,
            placement_fails: false,
            store: None,
        }
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");

    let config = create_test_config(upload_dir.path().to_path_buf(), storage_dir.path());
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));

    let local = Arc::new(
        LocalStorage::new(
            storage_dir.path(),
            MEDIA_BASE_URL.to_string(),
            TEST_BUCKET.to_string(),
            TEST_JWT_SECRET.as_bytes().to_vec(),
            clock.clone() as Arc<dyn Clock>,
        )
        .await
        .expect("Failed to create local storage"),
    );
    let storage: Arc<dyn Storage> = if options.placement_fails {
        Arc::new(RejectingStorage {
            inner: local.clone(),
        })
    } else {
        local.clone()
    };

    let store: Arc<dyn VideoStore> = options
        .store
        .unwrap_or_else(|| Arc::new(InMemoryVideoStore::new()));

    let introspector = Arc::new(CountingIntrospector::new(
        options.stream,
        options.introspect_fails,
    ));
    let remuxer = Arc::new(CountingRemuxer::new(
        upload_dir.path().to_path_buf(),
        options.remux_fails,
    ));

    let uploads = VideoUploadService::new(
        store.clone(),
        storage.clone(),
        introspector.clone(),
        remuxer.clone(),
        UploadLimits {
            temp_dir: upload_dir.path().to_path_buf(),
            max_video_bytes: config.max_video_size_bytes(),
            max_thumbnail_bytes: config.max_thumbnail_size_bytes(),
        },
    );

    let state = Arc::new(AppState {
        credentials: Arc::new(JwtValidator::new(TEST_JWT_SECRET)),
        videos: store.clone(),
        storage,
        local_media: Some(local),
        uploads,
        config,
    });

    let app = routes::setup_routes(state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        clock,
        introspector,
        remuxer,
        jwt: JwtValidator::new(TEST_JWT_SECRET),
        upload_dir,
        _storage_dir: storage_dir,
    }
}

fn create_test_config(upload_dir: PathBuf, storage_dir: &std::path::Path) -> Config {
    Config(Box::new(AppConfig {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        database_url: None,
        db_max_connections: 1,
        db_timeout_seconds: 5,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        aws_access_key_id: None,
        aws_secret_access_key: None,
        local_storage_path: Some(storage_dir.display().to_string()),
        local_storage_base_url: Some(MEDIA_BASE_URL.to_string()),
        local_storage_bucket: TEST_BUCKET.to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        upload_temp_dir: upload_dir,
        max_video_size_bytes: 4 * 1024 * 1024,
        max_thumbnail_size_bytes: 1024 * 1024,
    }))
}
