#[tokio::main]
async fn main() {
    if let Err(e) = medscan_lib::run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
