#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashgenius_backend::run().await
}
