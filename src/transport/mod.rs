// Transport module
//
// Everything that executes an outbound request:
// - http: hyper client with dial, keep-alive, TLS handshake and response-header timeouts
// - signing: decorator that signs each request before delegating to another transport

pub mod http;
pub mod signing;

pub use http::HttpTransport;
pub use signing::SigningTransport;

use crate::error::TransportError;
use hyper::{Body, Request, Response};
use std::future::Future;
use std::time::Duration;

/// Executes one HTTP exchange. Implementations never retry.
pub trait RoundTrip: Send + Sync {
    fn round_trip(&self, req: Request<Body>) -> impl Future<Output = Result<Response<Body>, TransportError>> + Send;
}

/// Timeouts applied by [`HttpTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub dial_timeout: Duration,
    pub keep_alive: Duration,
    pub tls_handshake_timeout: Duration,
    /// `None` waits for response headers indefinitely
    pub response_header_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(30),
            keep_alive: Duration::from_secs(30),
            tls_handshake_timeout: Duration::from_secs(10),
            response_header_timeout: None,
        }
    }
}
