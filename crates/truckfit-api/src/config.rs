use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::warn;

/// Server settings, read from `TRUCKFIT_*` environment variables.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Catalog file replacing the built-in furniture
    pub catalog_path: Option<PathBuf>,
}

impl ApiConfig {
    const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    const DEFAULT_PORT: u16 = 3000;

    pub fn from_env() -> Self {
        Self {
            host: parse_host(env_string("TRUCKFIT_API_HOST").as_deref()),
            port: parse_port(env_string("TRUCKFIT_API_PORT").as_deref()),
            catalog_path: env_string("TRUCKFIT_CATALOG").map(PathBuf::from),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_host(raw: Option<&str>) -> IpAddr {
    match raw.map(str::parse::<IpAddr>) {
        None => ApiConfig::DEFAULT_HOST,
        Some(Ok(ip)) => ip,
        Some(Err(err)) => {
            warn!(
                "Could not parse TRUCKFIT_API_HOST ({}), using {}",
                err,
                ApiConfig::DEFAULT_HOST
            );
            ApiConfig::DEFAULT_HOST
        }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw.map(str::parse::<u16>) {
        None => ApiConfig::DEFAULT_PORT,
        Some(Ok(port)) if port != 0 => port,
        Some(Ok(_)) => {
            warn!(
                "TRUCKFIT_API_PORT must not be 0, using {}",
                ApiConfig::DEFAULT_PORT
            );
            ApiConfig::DEFAULT_PORT
        }
        Some(Err(err)) => {
            warn!(
                "Could not parse TRUCKFIT_API_PORT ({}), using {}",
                err,
                ApiConfig::DEFAULT_PORT
            );
            ApiConfig::DEFAULT_PORT
        }
    }
}
