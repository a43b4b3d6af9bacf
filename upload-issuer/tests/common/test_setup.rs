use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use axum::{body::Body, http::Request, response::Response, Router};
use http_body_util::BodyExt;
use media_storage::{store::mock::MockObjectStore, Environment, MediaStorage, ObjectStore};
use tower::ServiceExt;
use upload_issuer::{cors::CorsConfig, server, types::IssuerConfig};

pub const TEST_BUCKET: &str = "image-uploads-test";

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Router wired to a chosen object store
pub struct TestContext {
    pub router: Router,
}

impl TestContext {
    /// Router backed by the in-memory store
    pub fn new(app_url: Option<&str>) -> Self {
        Self::with_store(
            Environment::Development {
                presign_expiry_override: None,
            },
            app_url,
            Arc::new(MockObjectStore::new()),
        )
    }

    /// Router backed by a real S3 client that signs offline against LocalStack's endpoint
    pub fn with_offline_s3(environment: Environment) -> Self {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::from_keys("test", "test", None))
            .endpoint_url("http://localhost:4566")
            .force_path_style(true)
            .build();
        let s3_client = Arc::new(S3Client::from_conf(config));

        Self::with_store(
            environment,
            None,
            Arc::new(MediaStorage::new(s3_client, TEST_BUCKET.to_string())),
        )
    }

    pub fn with_store(
        environment: Environment,
        app_url: Option<&str>,
        media_storage: Arc<dyn ObjectStore>,
    ) -> Self {
        setup_test_env();

        let config = IssuerConfig {
            bucket_name: TEST_BUCKET.to_string(),
            cors: app_url.map(|url| CorsConfig::new(url).expect("valid origin")),
        };

        Self {
            router: server::app(environment, &config, media_storage),
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .body(Body::empty())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
