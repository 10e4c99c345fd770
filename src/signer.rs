//! Request signing.
//!
//! A [`Signer`] turns the outbound request head plus the shared key into a
//! single header value. [`JwtSigner`] is the default: an HS256 JSON Web Token
//! binding the issuer, the issue time, the method and the path.

use crate::error::SignError;
use crate::secret::SecretKey;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use hyper::header::{HeaderName, HeaderValue};
use hyper::http::request::Parts;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

pub const API_REQUEST_HEADER: &str = "authpx-api-request";

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

pub trait Signer: Send + Sync {
    /// Header the signature is written to; any caller-supplied value is replaced
    fn header_name(&self) -> HeaderName;

    fn sign(&self, parts: &Parts, key: &SecretKey) -> Result<HeaderValue, SignError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub iat: u64,
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct JwtSigner {
    issuer: String,
}

impl JwtSigner {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self { issuer: issuer.into() }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Check a token produced by [`JwtSigner::sign`] and return its claims
    pub fn verify(token: &str, key: &SecretKey) -> Result<Claims, SignError> {
        let (signed, signature) = token.rsplit_once('.').ok_or(SignError::Malformed)?;
        let (_, payload) = signed.split_once('.').ok_or(SignError::Malformed)?;
        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| SignError::Malformed)?;

        let mut mac = mac(key);
        mac.update(signed.as_bytes());
        mac.verify_slice(&signature).map_err(|_| SignError::BadSignature)?;

        let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| SignError::Malformed)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    fn encode(&self, claims: &Claims, key: &SecretKey) -> Result<String, SignError> {
        let payload = serde_json::to_vec(claims)?;
        let signed = format!("{}.{}", URL_SAFE_NO_PAD.encode(JWT_HEADER), URL_SAFE_NO_PAD.encode(payload));

        let mut mac = mac(key);
        mac.update(signed.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signed}.{signature}"))
    }
}

impl Signer for JwtSigner {
    fn header_name(&self) -> HeaderName {
        HeaderName::from_static(API_REQUEST_HEADER)
    }

    fn sign(&self, parts: &Parts, key: &SecretKey) -> Result<HeaderValue, SignError> {
        let claims = Claims {
            iss: self.issuer.clone(),
            iat: SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default(),
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
        };
        Ok(HeaderValue::from_str(&self.encode(&claims, key)?)?)
    }
}

fn mac(key: &SecretKey) -> HmacSha256 {
    HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length")
}
