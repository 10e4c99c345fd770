use crate::error::TransportError;
use crate::secret::Secret;
use crate::signer::{JwtSigner, Signer};
use crate::transport::RoundTrip;
use hyper::{Body, Request, Response};
use log::warn;
use std::sync::Arc;

/// Signs every request with the shared secret, then hands it to `inner`.
pub struct SigningTransport<T, S = JwtSigner> {
    inner: T,
    secret: Arc<Secret>,
    signer: S,
}

impl<T: RoundTrip, S: Signer> SigningTransport<T, S> {
    pub fn new(inner: T, secret: Arc<Secret>, signer: S) -> Self {
        Self { inner, secret, signer }
    }

    pub fn secret(&self) -> &Arc<Secret> {
        &self.secret
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: RoundTrip, S: Signer> RoundTrip for SigningTransport<T, S> {
    async fn round_trip(&self, req: Request<Body>) -> Result<Response<Body>, TransportError> {
        let key = self.secret.value().await.inspect_err(|e| warn!("Cannot sign request, secret unavailable: {}", e))?;

        let (mut parts, body) = req.into_parts();
        let signature = self.signer.sign(&parts, &key)?;
        parts.headers.insert(self.signer.header_name(), signature);

        self.inner.round_trip(Request::from_parts(parts, body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignError;
    use crate::secret::SecretKey;
    use crate::signer::API_REQUEST_HEADER;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use hyper::StatusCode;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Records the headers it saw and answers 204.
    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
        signature: Mutex<Option<String>>,
    }

    impl RoundTrip for Recorder {
        async fn round_trip(&self, req: Request<Body>) -> Result<Response<Body>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let signature = req.headers().get(API_REQUEST_HEADER).map(|v| v.to_str().unwrap().to_string());
            *self.signature.lock().unwrap() = signature;
            Ok(Response::builder().status(StatusCode::NO_CONTENT).body(Body::empty()).unwrap())
        }
    }

    fn secret_in(dir: &TempDir) -> Arc<Secret> {
        let path = dir.path().join(".authpx_secret");
        std::fs::write(&path, STANDARD.encode([5u8; 32])).unwrap();
        Arc::new(Secret::new(path))
    }

    #[tokio::test]
    async fn test_adds_verifiable_signature() {
        let dir = TempDir::new().unwrap();
        let transport = SigningTransport::new(Recorder::default(), secret_in(&dir), JwtSigner::new("authpx-test"));

        let req = Request::post("http://upstream/api/v4/internal").body(Body::from("payload")).unwrap();
        let response = transport.round_trip(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let token = transport.inner().signature.lock().unwrap().clone().unwrap();
        let claims = JwtSigner::verify(&token, &SecretKey::from([5u8; 32])).unwrap();
        assert_eq!(claims.path, "/api/v4/internal");
        assert_eq!(claims.method, "POST");
    }

    #[tokio::test]
    async fn test_overrides_caller_signature() {
        let dir = TempDir::new().unwrap();
        let transport = SigningTransport::new(Recorder::default(), secret_in(&dir), JwtSigner::new("authpx-test"));

        let req = Request::get("http://upstream/").header(API_REQUEST_HEADER, "forged").body(Body::empty()).unwrap();
        transport.round_trip(req).await.unwrap();

        let token = transport.inner().signature.lock().unwrap().clone().unwrap();
        assert_ne!(token, "forged");
        assert!(JwtSigner::verify(&token, &SecretKey::from([5u8; 32])).is_ok());
    }

    #[tokio::test]
    async fn test_missing_secret_fails_without_sending() {
        let dir = TempDir::new().unwrap();
        let secret = Arc::new(Secret::new(dir.path().join("not-yet-generated")));
        let transport = SigningTransport::new(Recorder::default(), secret, JwtSigner::new("authpx-test"));

        let err = transport.round_trip(Request::get("http://upstream/").body(Body::empty()).unwrap()).await.unwrap_err();
        assert!(matches!(err, TransportError::Secret(_)));
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 0);
    }

    struct FailingSigner;

    impl Signer for FailingSigner {
        fn header_name(&self) -> hyper::header::HeaderName {
            hyper::header::HeaderName::from_static("x-signature")
        }

        fn sign(&self, _parts: &hyper::http::request::Parts, _key: &SecretKey) -> Result<hyper::header::HeaderValue, SignError> {
            Err(SignError::Malformed)
        }
    }

    #[tokio::test]
    async fn test_signer_failure_is_propagated() {
        let dir = TempDir::new().unwrap();
        let transport = SigningTransport::new(Recorder::default(), secret_in(&dir), FailingSigner);

        let err = transport.round_trip(Request::get("http://upstream/").body(Body::empty()).unwrap()).await.unwrap_err();
        assert_eq!(err.to_string(), "malformed signature token");
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 0);
    }
}
