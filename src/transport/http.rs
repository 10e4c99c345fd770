use crate::error::TransportError;
use crate::transport::{RoundTrip, TransportConfig};
use crate::utils::validation::validate_dial_port;
use hyper::body::HttpBody;
use hyper::client::HttpConnector;
use hyper::http::uri::Scheme;
use hyper::service::Service;
use hyper::{Body, Client, Request, Response, Uri};
use hyper_tls::HttpsConnector;
use log::{debug, trace};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Plain network transport backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HandshakeTimeout<HttpsConnector<HttpConnector>>, Body>,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(config.dial_timeout));
        http.set_keepalive(Some(config.keep_alive));

        let https = HttpsConnector::new_with_connector(http);
        // The TCP dial keeps its own timeout; the handshake budget comes on top of it.
        let connector = HandshakeTimeout::new(https, config.dial_timeout + config.tls_handshake_timeout);
        let client = Client::builder().build(connector);

        Self { client, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl RoundTrip for HttpTransport {
    async fn round_trip(&self, req: Request<Body>) -> Result<Response<Body>, TransportError> {
        if let Some(authority) = req.uri().authority() {
            validate_dial_port(authority.as_str())?;
        }
        trace!("Sending {} {}", req.method(), req.uri());

        let Some(limit) = self.config.response_header_timeout else {
            return self.client.request(req).await.map_err(Into::into);
        };

        // The header clock starts once the request body is written.
        // `Client::request` resolves as soon as the response head has been read.
        let (req, written) = watch_upload(req);
        let response = self.client.request(req);
        tokio::pin!(response);
        tokio::select! {
            result = &mut response => return result.map_err(Into::into),
            _ = written => {}
        }
        tokio::time::timeout(limit, response).await.map_err(|_| TransportError::ResponseHeaderTimeout)?.map_err(Into::into)
    }
}

/// Pipe the request body through a channel so the returned receiver fires once
/// the last chunk has been handed to the connection. A body that fails or is
/// abandoned mid-upload drops the sender instead.
fn watch_upload(req: Request<Body>) -> (Request<Body>, oneshot::Receiver<()>) {
    let (done, written) = oneshot::channel();
    if req.body().is_end_stream() {
        let _ = done.send(());
        return (req, written);
    }

    let (parts, mut body) = req.into_parts();
    let (mut sender, piped) = Body::channel();
    tokio::spawn(async move {
        while let Some(chunk) = body.data().await {
            match chunk {
                Ok(chunk) => {
                    if sender.send_data(chunk).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    debug!("Request body failed mid-upload: {}", e);
                    sender.abort();
                    return;
                }
            }
        }
        if let Ok(Some(trailers)) = body.trailers().await {
            let _ = sender.send_trailers(trailers).await;
        }
        drop(sender);
        let _ = done.send(());
    });

    (Request::from_parts(parts, piped), written)
}

/// Connector wrapper bounding how long establishing a TLS connection may take.
/// Plain `http` destinations are passed through untouched.
#[derive(Clone)]
pub struct HandshakeTimeout<C> {
    inner: C,
    timeout: Duration,
}

impl<C> HandshakeTimeout<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<C> Service<Uri> for HandshakeTimeout<C>
where
    C: Service<Uri>,
    C::Response: Send + 'static,
    C::Error: Into<BoxError>,
    C::Future: Send + 'static,
{
    type Response = C::Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, dst: Uri) -> Self::Future {
        let tls = dst.scheme() == Some(&Scheme::HTTPS);
        let timeout = self.timeout;
        let connecting = self.inner.call(dst);
        Box::pin(async move {
            if !tls {
                return connecting.await.map_err(Into::into);
            }
            match tokio::time::timeout(timeout, connecting).await {
                Ok(connected) => connected.map_err(Into::into),
                Err(_) => Err(Box::new(TransportError::TlsHandshakeTimeout) as BoxError),
            }
        })
    }
}
