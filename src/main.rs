#[actix_web::main]
async fn main() -> std::io::Result<()> {
    lacak::run().await
}
