use std::{env, net::IpAddr, net::Ipv4Addr, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub debug: bool,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let debug = lookup("APP_DEBUG").is_some_and(|value| parse_flag(&value));
        let data_dir = lookup("APP_DATA_DIR").map_or_else(|| PathBuf::from("data"), PathBuf::from);
        let static_dir =
            lookup("APP_STATIC_DIR").map_or_else(|| PathBuf::from("static"), PathBuf::from);

        Self {
            port,
            debug,
            data_dir,
            static_dir,
        }
    }

    /// Debug runs stay on loopback; otherwise listen on every interface.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = if self.debug {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        };
        SocketAddr::new(ip, self.port)
    }

    pub fn log_directive(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_with(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.debug);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.bind_addr().ip(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn debug_binds_loopback() {
        let config = config_with(&[("APP_DEBUG", "true"), ("PORT", "8123")]);
        assert!(config.debug);
        assert_eq!(config.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 8123)));
        assert_eq!(config.log_directive(), "debug");
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = config_with(&[("PORT", "http"), ("APP_DEBUG", "0")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.debug);
    }
}
