use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use image_processor::processor::VariantProcessor;
use image_processor::types::ProcessorConfig;
use media_storage::store::mock::MockObjectStore;
use media_storage::ObjectStore;

pub const TEST_BUCKET: &str = "image-uploads-test";

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// PNG bytes of a solid-colour image
pub fn png_image(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode test image");
    buf.into_inner()
}

/// Processor wired to an in-memory store the test keeps a handle on
pub struct TestContext {
    pub store: Arc<MockObjectStore>,
    pub processor: VariantProcessor,
}

impl TestContext {
    pub fn new(
        store: MockObjectStore,
        sizes: &str,
        fits: Option<&str>,
        qualities: Option<&str>,
    ) -> Self {
        Self::with_format(store, sizes, fits, qualities, None)
    }

    pub fn with_format(
        store: MockObjectStore,
        sizes: &str,
        fits: Option<&str>,
        qualities: Option<&str>,
        format: Option<&str>,
    ) -> Self {
        setup_test_env();

        let config =
            ProcessorConfig::from_parts(TEST_BUCKET.to_string(), sizes, fits, qualities, format)
                .expect("valid test configuration");
        let store = Arc::new(store);
        let media_storage: Arc<dyn ObjectStore> = store.clone();

        Self {
            store,
            processor: VariantProcessor::new(media_storage, config),
        }
    }

    /// Keys written by the processor, sorted
    pub fn sorted_put_attempts(&self) -> Vec<String> {
        let mut keys = self.store.put_attempts();
        keys.sort();
        keys
    }
}
