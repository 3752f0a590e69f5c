use argh::FromArgs;
use std::path::PathBuf;

fn default_config_path() -> PathBuf {
    PathBuf::from("./dns_server.toml")
}

#[derive(Debug, FromArgs)]
#[argh(description = "caching DNS responder serving records from a seed file")]
pub struct CliArgs {
    #[argh(
        option,
        description = "config file path, default: './dns_server.toml'",
        default = "default_config_path()"
    )]
    pub config: PathBuf,
}
