//! Upload issuer for browser callers: same endpoint, plus CORS headers for `APP_URL`

use upload_issuer::{server, types::IssuerVariant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(IssuerVariant::Cors).await
}
