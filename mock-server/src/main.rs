mod logging;

use mock_server::MockConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    logging::init_subscriber();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut config = MockConfig::default();
    if let Ok(secret) = std::env::var("OTP_SECRET") {
        config.secret = secret;
    }
    if let Ok(token) = std::env::var("OTP_TOKEN") {
        config.valid_token = token;
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    mock_server::run(listener, config).await
}
