#[tokio::main]
async fn main() {
    noticeboard_backend::run().await;
}
