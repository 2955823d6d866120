#[actix_web::main]
async fn main() {
    if let Err(err) = newsapi_mcp_server::run().await {
        // The logger may not be up yet when config loading fails.
        eprintln!("newsapi-mcp-server: {:#}", err);
        std::process::exit(1);
    }
}
