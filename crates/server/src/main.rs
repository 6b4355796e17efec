#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chillbot_server::start().await
}
