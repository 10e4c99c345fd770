use hyper::body::to_bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Body, Response, StatusCode};
use log::{error, warn};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MESSAGE: &str = "Request took too long";

/// Wall-clock budget for producing a complete response.
///
/// The wrapped handler's response, body included, is collected within the
/// budget. When it runs out the handler future is dropped and the caller gets
/// a 503 carrying the fixed message instead.
#[derive(Debug, Clone)]
pub struct Deadline {
    duration: Duration,
    message: String,
}

impl Deadline {
    pub fn new(duration: Duration, message: impl Into<String>) -> Self {
        Self { duration, message: message.into() }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub async fn run<F>(&self, handler: F) -> Response<Body>
    where
        F: Future<Output = Response<Body>>,
    {
        let completed = async {
            let (parts, body) = handler.await.into_parts();
            to_bytes(body).await.map(|bytes| Response::from_parts(parts, Body::from(bytes)))
        };

        match tokio::time::timeout(self.duration, completed).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!("Failed to read response body: {}", e);
                text_response(StatusCode::BAD_GATEWAY, e.to_string())
            }
            Err(_) => {
                warn!("Request exceeded its {:?} budget", self.duration);
                text_response(StatusCode::SERVICE_UNAVAILABLE, self.message.clone())
            }
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::new(Duration::from_secs(600), DEFAULT_TIMEOUT_MESSAGE)
    }
}

fn text_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}
