//! Authenticated reverse proxy.
//!
//! Inbound requests are forwarded to a single upstream. Each outbound request
//! carries a signature computed with a shared 32-byte secret, loaded lazily
//! from a base64 file, so the upstream can trust that it came from the proxy.
//! Failures to reach the upstream are answered with `502 Bad Gateway`; an
//! optional caller-side [`proxy::Deadline`] answers `503` when the whole
//! exchange takes too long.

pub mod config;
pub mod error;
pub mod proxy;
pub mod secret;
pub mod signer;
pub mod transport;
pub mod upstream;
pub mod utils;

pub use error::{SecretError, SignError, TransportError, UpstreamError};
pub use secret::{Secret, SecretKey};
pub use upstream::Upstream;
