use crate::error::UpstreamError;
use crate::proxy::Deadline;
use crate::proxy::deadline::DEFAULT_TIMEOUT_MESSAGE;
use crate::transport::TransportConfig;
use crate::upstream::Upstream;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub(crate) path: PathBuf,
    // Address the proxy listens on
    #[serde(default = "default_listen")]
    pub listen: String,
    // Base URL every request is forwarded to
    #[serde(default = "default_upstream")]
    pub upstream: String,
    // Base64 file holding the 32 byte shared secret; may be created after startup
    #[serde(default = "default_secret_path")]
    pub secret_path: PathBuf,
    // Sent to the upstream in the Authpx-Version header
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_dial_timeout")]
    pub dial_timeout_secs: u64,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
    #[serde(default = "default_tls_handshake_timeout")]
    pub tls_handshake_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_header_timeout_secs: Option<u64>,
    // 0 disables the caller-side deadline
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_request_timeout_message")]
    pub request_timeout_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new("./authpx.json")
    }
}

impl Config {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().with_extension("json"),
            listen: default_listen(),
            upstream: default_upstream(),
            secret_path: default_secret_path(),
            version: default_version(),
            dial_timeout_secs: default_dial_timeout(),
            keep_alive_secs: default_keep_alive(),
            tls_handshake_timeout_secs: default_tls_handshake_timeout(),
            response_header_timeout_secs: None,
            request_timeout_secs: default_request_timeout(),
            request_timeout_message: default_request_timeout_message(),
        }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            dial_timeout: Duration::from_secs(self.dial_timeout_secs),
            keep_alive: Duration::from_secs(self.keep_alive_secs),
            tls_handshake_timeout: Duration::from_secs(self.tls_handshake_timeout_secs),
            response_header_timeout: self.response_header_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn deadline(&self) -> Option<Deadline> {
        if self.request_timeout_secs == 0 {
            return None;
        }
        Some(Deadline::new(Duration::from_secs(self.request_timeout_secs), self.request_timeout_message.clone()))
    }

    /// Build the proxy described by this configuration
    pub fn bind_upstream(&self) -> Result<Upstream, UpstreamError> {
        Upstream::with_transport(&self.upstream, &self.secret_path, &self.version, self.transport_config())
    }
}

fn default_listen() -> String {
    "127.0.0.1:8181".to_string()
}

fn default_upstream() -> String {
    "http://localhost:8080".to_string()
}

fn default_secret_path() -> PathBuf {
    PathBuf::from("./.authpx_secret")
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_dial_timeout() -> u64 {
    30
}

fn default_keep_alive() -> u64 {
    30
}

fn default_tls_handshake_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    600
}

fn default_request_timeout_message() -> String {
    DEFAULT_TIMEOUT_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"upstream": "http://10.0.0.2:3000"}"#).unwrap();
        assert_eq!(config.upstream, "http://10.0.0.2:3000");
        assert_eq!(config.listen, "127.0.0.1:8181");
        assert_eq!(config.dial_timeout_secs, 30);
        assert_eq!(config.response_header_timeout_secs, None);
        assert_eq!(config.request_timeout_message, "Request took too long");
    }

    #[test]
    fn test_transport_config() {
        let mut config = Config::new("/tmp/authpx.json");
        config.response_header_timeout_secs = Some(2);
        let transport = config.transport_config();
        assert_eq!(transport.dial_timeout, Duration::from_secs(30));
        assert_eq!(transport.keep_alive, Duration::from_secs(30));
        assert_eq!(transport.tls_handshake_timeout, Duration::from_secs(10));
        assert_eq!(transport.response_header_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_zero_request_timeout_disables_deadline() {
        let mut config = Config::new("/tmp/authpx.json");
        assert_eq!(config.deadline().unwrap().duration(), Duration::from_secs(600));
        config.request_timeout_secs = 0;
        assert!(config.deadline().is_none());
    }

    #[test]
    fn test_bind_upstream() {
        let config = Config::new("/tmp/authpx.json");
        let upstream = config.bind_upstream().unwrap();
        assert_eq!(upstream.proxy().target().to_string(), "http://localhost:8080");
    }
}
