#[actix_web::main]
async fn main() -> std::io::Result<()> {
    document_merge_functions::run().await
}
