use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::Client as S3Client;
use axum::{Extension, Router};
use media_storage::{Environment, MediaStorage, ObjectStore};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::routes;
use crate::types::{IssuerConfig, IssuerVariant};

/// Set by the Lambda service in every function container
const LAMBDA_RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

/// Builds the issuer router with its dependencies attached
#[must_use]
pub fn app(
    environment: Environment,
    config: &IssuerConfig,
    media_storage: Arc<dyn ObjectStore>,
) -> Router {
    let router = routes::handler()
        .layer(Extension(environment))
        .layer(Extension(media_storage))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(5)));

    match &config.cors {
        Some(cors) => cors.decorate(router),
        None => router,
    }
}

/// Loads configuration, builds the S3 client and serves the issuer
///
/// # Errors
///
/// Returns an error if required configuration is missing or the server fails
pub async fn run(variant: IssuerVariant) -> anyhow::Result<()> {
    let environment = Environment::from_env()?;
    environment.init_tracing();

    let config = IssuerConfig::from_env(variant).inspect_err(|e| {
        tracing::error!(error = %e, "Refusing to start with invalid configuration");
    })?;

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let media_storage: Arc<dyn ObjectStore> =
        Arc::new(MediaStorage::new(s3_client, config.bucket_name.clone()));

    start(environment, &config, media_storage).await
}

/// Serves the router as a Lambda function, or over TCP when run locally
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    config: &IssuerConfig,
    media_storage: Arc<dyn ObjectStore>,
) -> anyhow::Result<()> {
    let router = app(environment, config, media_storage);

    if std::env::var(LAMBDA_RUNTIME_API_VAR).is_ok() {
        tracing::info!(
            bucket = %config.bucket_name,
            cors = config.cors.is_some(),
            "Upload issuer started in Lambda"
        );
        return lambda_http::run(router)
            .await
            .map_err(|e| anyhow::anyhow!(e));
    }

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(bucket = %config.bucket_name, "Upload issuer started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
