use std::sync::Arc;

use aws_lambda_events::event::s3::S3Event;
use aws_sdk_s3::Client as S3Client;
use image_processor::handler::function_handler;
use image_processor::processor::VariantProcessor;
use image_processor::types::ProcessorConfig;
use lambda_runtime::{service_fn, LambdaEvent};
use media_storage::{Environment, MediaStorage, ObjectStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env()?;
    environment.init_tracing();

    let config = ProcessorConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Refusing to start with invalid configuration");
    })?;

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let media_storage: Arc<dyn ObjectStore> =
        Arc::new(MediaStorage::new(s3_client, config.bucket_name.clone()));

    tracing::info!(
        bucket = %config.bucket_name,
        sizes = ?config.sizes,
        fits = ?config.fits,
        format = %config.format,
        "Image processor started"
    );

    let processor = VariantProcessor::new(media_storage, config);

    lambda_runtime::run(service_fn(|event: LambdaEvent<S3Event>| {
        function_handler(event, &processor)
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
