use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub fn get_config<'de, T: Deserialize<'de>>(config_path: PathBuf) -> Result<T, config::ConfigError> {
    let f = config::File::from(config_path);
    let config = config::Config::builder().add_source(f).build()?;
    config.try_deserialize::<T>()
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub server: ServerConfiguration,
    pub cache: CacheConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct LookupSettings {
    #[serde(default)]
    pub resolver: ResolverConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfiguration {
    ip_address: IpAddr,
    port: u16,
    #[serde(default = "default_true")]
    pub tcp: bool,
    #[serde(default = "default_max_udp_response")]
    pub max_udp_response: usize,
}

impl ServerConfiguration {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.ip_address, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct CacheConfiguration {
    pub seed_path: PathBuf,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResolverConfiguration {
    #[serde(default = "default_resolver_server")]
    server: IpAddr,
    #[serde(default = "default_dns_port")]
    port: u16,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

impl ResolverConfiguration {
    pub fn server_address(&self) -> SocketAddr {
        SocketAddr::new(self.server, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ResolverConfiguration {
    fn default() -> Self {
        Self {
            server: default_resolver_server(),
            port: default_dns_port(),
            timeout_ms: default_timeout_ms(),
            attempts: default_attempts(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_udp_response() -> usize {
    512
}

fn default_capacity() -> usize {
    1024
}

fn default_resolver_server() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))
}

fn default_dns_port() -> u16 {
    53
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_attempts() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn server_settings() {
        let path = write_config(
            "server-settings",
            r#"
[server]
ip_address = "127.0.0.1"
port = 5353
tcp = false

[cache]
seed_path = "cache.db"
"#,
        );

        let settings: ServerSettings = get_config(path.clone()).unwrap();
        let _ = std::fs::remove_file(path);

        assert_eq!(settings.server.bind_address(), "127.0.0.1:5353".parse().unwrap());
        assert!(!settings.server.tcp);
        assert_eq!(settings.server.max_udp_response, 512);
        assert_eq!(settings.cache.seed_path, PathBuf::from("cache.db"));
        assert_eq!(settings.cache.capacity, 1024);
    }

    #[test]
    fn resolver_defaults() {
        let path = write_config(
            "lookup-settings",
            r#"
[resolver]
server = "1.1.1.1"
timeout_ms = 250
"#,
        );

        let settings: LookupSettings = get_config(path.clone()).unwrap();
        let _ = std::fs::remove_file(path);

        let resolver = settings.resolver;
        assert_eq!(resolver.server_address(), "1.1.1.1:53".parse().unwrap());
        assert_eq!(resolver.timeout(), Duration::from_millis(250));
        assert_eq!(resolver.attempts, 2);
    }

    #[test]
    fn missing_section_is_an_error() {
        let path = write_config("broken-settings", "[server]\nport = 53\n");
        let ret: Result<ServerSettings, _> = get_config(path.clone());
        let _ = std::fs::remove_file(path);

        assert!(ret.is_err());
    }
}
