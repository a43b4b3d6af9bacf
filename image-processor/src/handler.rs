use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::LambdaEvent;
use tracing::{info, instrument, warn};

use crate::processor::VariantProcessor;

/// Object keys named by an S3 notification, URL-decoded
///
/// S3 form-encodes keys in notifications, so `+` stands for a space.
/// Records without a key are dropped.
#[must_use]
pub fn object_keys(event: &S3Event) -> Vec<String> {
    event
        .records
        .iter()
        .filter_map(|record| record.s3.object.key.as_deref())
        .map(decode_key)
        .collect()
}

fn decode_key(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(key) => key.into_owned(),
        Err(e) => {
            warn!(key = %raw, error = %e, "Object key is not valid UTF-8 once decoded, using it as is");
            plus_decoded
        }
    }
}

/// Handles one object-created notification
///
/// # Errors
///
/// Returns an error if any derivative of any record could not be produced,
/// which lets the event source retry the invocation
#[instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    event: LambdaEvent<S3Event>,
    processor: &VariantProcessor,
) -> Result<(), lambda_runtime::Error> {
    let keys = object_keys(&event.payload);
    info!(records = event.payload.records.len(), keys = ?keys, "Received S3 event");

    let written = processor.process_batch(&keys).await?;

    info!(written, "Finished processing event");
    Ok(())
}
