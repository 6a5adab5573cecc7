use dotenv::dotenv;
use hbnb::api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    server::run_server().await
}
