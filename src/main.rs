#[actix_web::main]
async fn main() -> std::io::Result<()> {
    permit_extract_server::run().await
}
