//! Error types shared by the secret store, the signer and the transports.
//!
//! Everything that can go wrong while forwarding a request ends up as a
//! [`TransportError`]; the reverse proxy renders it as a 502 whose body is the
//! error's `Display` text.

use hyper::header::InvalidHeaderValue;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("read secret {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decode secret {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: base64::DecodeError,
    },
    #[error("expected {expected} secret bytes in {}, found {found}", .path.display())]
    Length { path: PathBuf, expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum SignError {
    #[error("encode signature claims: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("signature is not a valid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
    #[error("malformed signature token")]
    Malformed,
    #[error("signature mismatch")]
    BadSignature,
}

/// Failure to complete an exchange with the upstream.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("dial tcp: invalid port {0}")]
    InvalidPort(String),
    #[error("TLS handshake timeout")]
    TlsHandshakeTimeout,
    #[error("net/http: timeout awaiting response headers")]
    ResponseHeaderTimeout,
    #[error("invalid upstream request: {0}")]
    InvalidRequest(#[from] hyper::http::Error),
    #[error(transparent)]
    Http(#[from] hyper::Error),
    #[error(transparent)]
    Secret(#[from] SecretError),
    #[error(transparent)]
    Sign(#[from] SignError),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream url {0:?} has no scheme")]
    MissingScheme(String),
    #[error("unsupported upstream scheme {0:?}")]
    UnsupportedScheme(String),
    #[error("upstream url {0:?} has no host")]
    MissingHost(String),
}
