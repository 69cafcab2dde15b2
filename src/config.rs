//! Server configuration.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;

use crate::core::WorkDelay;
use crate::error::ServeError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Local development origins allowed to call `/simulate` cross-origin.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://127.0.0.1:5500",
    "http://localhost:5500",
    "http://127.0.0.1:5501",
    "http://localhost:5501",
];

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub work_delay: WorkDelay,
    /// Fixed seed for every request that does not carry its own.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            work_delay: WorkDelay::default(),
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ServeError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|source| ServeError::Address { addr, source })
    }

    pub fn origin_header_values(&self) -> Result<Vec<HeaderValue>, ServeError> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/'))
                    .map_err(|_| ServeError::Origin(origin.clone()))
            })
            .collect()
    }

    /// Origins a browser reports when the landing page served by this
    /// process calls back into it. Loopback and wildcard binds are reachable
    /// as both `127.0.0.1` and `localhost`.
    pub fn self_origins(&self) -> Result<Vec<HeaderValue>, ServeError> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let hosts: Vec<String> = match host.parse::<IpAddr>() {
            Ok(ip) if ip.is_loopback() || ip.is_unspecified() => {
                vec!["127.0.0.1".to_string(), "localhost".to_string()]
            }
            Ok(IpAddr::V6(ip)) => vec![format!("[{ip}]")],
            Ok(IpAddr::V4(ip)) => vec![ip.to_string()],
            Err(_) if host.eq_ignore_ascii_case("localhost") => {
                vec!["127.0.0.1".to_string(), "localhost".to_string()]
            }
            Err(_) => vec![host.to_ascii_lowercase()],
        };

        hosts
            .into_iter()
            .map(|host| {
                let origin = format!("http://{host}:{}", self.port);
                HeaderValue::from_str(&origin).map_err(|_| ServeError::Origin(origin))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_development_setup() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.allowed_origins.len(), 4);
        assert_eq!(config.work_delay, WorkDelay::default());
        assert!(config.seed.is_none());
    }

    #[test]
    fn socket_addr_parses_host_and_port() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..ServerConfig::default()
        };
        let addr = config.socket_addr().expect("valid address");
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn socket_addr_rejects_hostnames() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            ..ServerConfig::default()
        };
        let err = config.socket_addr().expect_err("hostnames are not resolved");
        assert!(err.to_string().contains("localhost:5000"));
    }

    #[test]
    fn origins_drop_trailing_slash() {
        let config = ServerConfig {
            allowed_origins: vec!["http://localhost:3000/".to_string()],
            ..ServerConfig::default()
        };
        let values = config.origin_header_values().expect("valid origins");
        assert_eq!(values, vec![HeaderValue::from_static("http://localhost:3000")]);
    }

    #[test]
    fn loopback_bind_accepts_both_local_names() {
        let origins = ServerConfig::default().self_origins().expect("valid origins");
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://127.0.0.1:5000"),
                HeaderValue::from_static("http://localhost:5000"),
            ]
        );
    }

    #[test]
    fn self_origins_follow_the_configured_address() {
        let config = ServerConfig {
            host: "192.168.1.20".to_string(),
            port: 8080,
            ..ServerConfig::default()
        };
        let origins = config.self_origins().expect("valid origins");
        assert_eq!(origins, vec![HeaderValue::from_static("http://192.168.1.20:8080")]);

        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            ..ServerConfig::default()
        };
        let origins = config.self_origins().expect("valid origins");
        assert!(origins.contains(&HeaderValue::from_static("http://localhost:5000")));
        assert!(!origins.contains(&HeaderValue::from_static("http://0.0.0.0:5000")));
    }

    #[test]
    fn origins_reject_control_characters() {
        let config = ServerConfig {
            allowed_origins: vec!["http://bad\norigin".to_string()],
            ..ServerConfig::default()
        };
        assert!(config.origin_header_values().is_err());
    }
}
