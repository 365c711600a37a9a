#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    fitcoach_backend::run().await;
}
