#[tokio::main]
async fn main() -> anyhow::Result<()> {
    grocery_server::start_server().await
}
