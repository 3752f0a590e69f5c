use configuration::ServerSettings;
use domain_name_cache::{CacheStore, Responder};
use std::error::Error;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tracing_subscriber::EnvFilter;

mod cli_args;
mod serve;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: cli_args::CliArgs = argh::from_env();
    let settings: ServerSettings = configuration::get_config(args.config)?;

    let mut store = CacheStore::with_capacity(settings.cache.capacity);
    let loaded = store.load_file(&settings.cache.seed_path, domain_name_cache::now())?;
    tracing::info!(
        "loaded {} records from {}",
        loaded,
        settings.cache.seed_path.display()
    );

    let responder =
        Responder::new(Arc::new(store)).with_udp_limit(settings.server.max_udp_response);

    let address = settings.server.bind_address();
    let udp = UdpSocket::bind(address).await?;
    tracing::info!("Listening on: {}, pid: {}", address, std::process::id());

    if settings.server.tcp {
        let listener = TcpListener::bind(address).await?;
        tokio::try_join!(
            serve::serve_udp(udp, responder.clone()),
            serve::serve_tcp(listener, responder)
        )?;
    } else {
        serve::serve_udp(udp, responder).await?;
    }

    Ok(())
}
