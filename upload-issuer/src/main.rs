use upload_issuer::{server, types::IssuerVariant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(IssuerVariant::Plain).await
}
