use argh::FromArgs;
use configuration::{LookupSettings, ResolverConfiguration};
use domain_name_resolver::Resolver;
use log::error;
use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, FromArgs)]
#[argh(description = "resolve the IPv4 address of a name through an upstream server")]
struct CliArgs {
    #[argh(positional, description = "name to resolve")]
    name: String,

    #[argh(positional, description = "upstream server address")]
    server: Option<IpAddr>,

    #[argh(option, description = "upstream port, default: 53")]
    port: Option<u16>,

    #[argh(option, description = "config file with a [resolver] section")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::try_init();

    let args: CliArgs = argh::from_env();

    let address = match (args.server, args.port, &args.config) {
        (Some(server), None, None) => domain_name_resolver::resolve(&args.name, server).await,
        _ => {
            let conf = match &args.config {
                Some(path) => configuration::get_config::<LookupSettings>(path.clone())?.resolver,
                None => ResolverConfiguration::default(),
            };
            let mut upstream = conf.server_address();
            if let Some(server) = args.server {
                upstream = SocketAddr::new(server, upstream.port());
            }
            if let Some(port) = args.port {
                upstream.set_port(port);
            }

            let resolver = Resolver::new(upstream)
                .with_timeout(conf.timeout())
                .with_attempts(conf.attempts);
            match resolver.lookup(&args.name).await {
                Ok(addr) => addr.map(|a| a.to_string()),
                Err(e) => {
                    error!("lookup of {} failed: {}", args.name, e);
                    None
                }
            }
        }
    };

    println!(
        "{} => {}",
        args.name,
        address.as_deref().unwrap_or("NONE")
    );

    Ok(())
}
