use std::io;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use linkboard::config::Config;
use linkboard::server::{self, ServerConfig};

#[actix_rt::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load().map_err(|e| {
        error!("{e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = ServerConfig::from(&config);
    info!(
        "Serving {} at {} on {}",
        store.store_path.display(),
        store.store_route(),
        config.addr
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(server::cors())
            .configure(server::configure(store.clone()))
    })
    .bind(config.addr)?
    .run()
    .await
}
