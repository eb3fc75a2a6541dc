#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pharmalens_server::start().await
}
