#[actix_web::main]
async fn main() -> std::io::Result<()> {
    etf_dashboard::app::run().await
}
