use crate::error::UpstreamError;
use crate::proxy::{ReverseProxy, UpstreamTarget};
use crate::secret::Secret;
use crate::signer::JwtSigner;
use crate::transport::{HttpTransport, SigningTransport, TransportConfig};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Issuer placed in every signature this proxy produces.
pub const DEFAULT_ISSUER: &str = "authpx";

pub type SignedProxy = ReverseProxy<SigningTransport<HttpTransport>>;

/// A reverse proxy bound to one upstream and one secret file.
#[derive(Clone)]
pub struct Upstream {
    proxy: Arc<SignedProxy>,
    secret: Arc<Secret>,
}

impl Upstream {
    pub fn new(url: &str, secret_path: impl Into<PathBuf>, version: &str) -> Result<Self, UpstreamError> {
        Self::with_transport(url, secret_path, version, TransportConfig::default())
    }

    pub fn with_transport(url: &str, secret_path: impl Into<PathBuf>, version: &str, config: TransportConfig) -> Result<Self, UpstreamError> {
        let target = UpstreamTarget::parse(url)?;
        let secret = Arc::new(Secret::new(secret_path));
        debug!("Binding upstream {} with secret {}", target, secret.path().display());

        let transport = SigningTransport::new(HttpTransport::new(config), secret.clone(), JwtSigner::new(DEFAULT_ISSUER));
        let proxy = Arc::new(ReverseProxy::new(target, transport, version));
        Ok(Self { proxy, secret })
    }

    pub fn proxy(&self) -> &Arc<SignedProxy> {
        &self.proxy
    }

    pub fn secret(&self) -> &Arc<Secret> {
        &self.secret
    }
}
