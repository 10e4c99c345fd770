use crate::config::types::Config;
use crate::proxy::UpstreamTarget;
use crate::utils::validation::{is_empty_or_whitespace, validate_timeout};
use anyhow::{Result, bail};
use std::net::SocketAddr;
use std::time::Duration;

impl Config {
    /// Parse the listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse::<SocketAddr>().map_err(|e| anyhow::anyhow!("Invalid listen address {:?}: {}", self.listen, e))
    }

    /// Check every field, reporting all problems at once
    pub fn validate(&self) -> Result<()> {
        let mut problems: Vec<String> = Vec::new();

        if let Err(e) = self.listen_addr() {
            problems.push(e.to_string());
        }
        if let Err(e) = UpstreamTarget::parse(&self.upstream) {
            problems.push(e.to_string());
        }
        if is_empty_or_whitespace(&self.secret_path.to_string_lossy()) {
            problems.push("secret_path must not be empty".to_string());
        }

        let timeouts = [
            ("dial_timeout_secs", Some(self.dial_timeout_secs)),
            ("keep_alive_secs", Some(self.keep_alive_secs)),
            ("tls_handshake_timeout_secs", Some(self.tls_handshake_timeout_secs)),
            ("response_header_timeout_secs", self.response_header_timeout_secs),
        ];
        for (name, secs) in timeouts {
            if let Some(Err(e)) = secs.map(|s| validate_timeout(name, Duration::from_secs(s))) {
                problems.push(e);
            }
        }

        if !problems.is_empty() {
            bail!("Invalid configuration: {}", problems.join("; "));
        }
        Ok(())
    }
}
