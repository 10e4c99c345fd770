use crate::error::TransportError;
use crate::proxy::target::UpstreamTarget;
use crate::transport::RoundTrip;
use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use hyper::{Body, Request, Response, StatusCode, Version};
use log::{debug, error, warn};
use std::net::IpAddr;

pub const VERSION_HEADER: &str = "authpx-version";

const X_FORWARDED_FOR: &str = "x-forwarded-for";

// Hop-by-hop headers apply to a single connection and are never forwarded.
const HOP_HEADERS: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Forwards every inbound request to one upstream through `transport`.
pub struct ReverseProxy<T> {
    target: UpstreamTarget,
    transport: T,
    version: Option<HeaderValue>,
}

impl<T: RoundTrip> ReverseProxy<T> {
    /// `version` is announced to the upstream in the `Authpx-Version` header; pass "" to omit it
    pub fn new(target: UpstreamTarget, transport: T, version: &str) -> Self {
        let version = match HeaderValue::from_str(version) {
            Ok(value) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(_) => {
                warn!("Version {:?} is not a valid header value and will not be sent", version);
                None
            }
        };
        Self { target, transport, version }
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle one inbound request. Upstream failures become a 502 whose body is
    /// the failure's own description, so this never returns an error.
    pub async fn handle(&self, client_ip: Option<IpAddr>, req: Request<Body>) -> Response<Body> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match self.forward(client_ip, req).await {
            Ok(response) => {
                debug!("{} {} -> {}{} answered {}", method, path, self.target, path, response.status());
                response
            }
            Err(e) => {
                error!("HTTP proxy error for {} {} -> {}: {}", method, path, self.target, e);
                bad_gateway(&e)
            }
        }
    }

    async fn forward(&self, client_ip: Option<IpAddr>, req: Request<Body>) -> Result<Response<Body>, TransportError> {
        let mut outbound = self.target.rewrite(req)?;
        *outbound.version_mut() = Version::HTTP_11;

        let headers = outbound.headers_mut();
        remove_hop_headers(headers);
        if let Some(ip) = client_ip {
            append_forwarded_for(headers, ip);
        }
        if let Some(version) = &self.version {
            headers.insert(HeaderName::from_static(VERSION_HEADER), version.clone());
        }

        let mut response = self.transport.round_trip(outbound).await?;
        remove_hop_headers(response.headers_mut());
        Ok(response)
    }
}

/// Strip hop-by-hop headers, including any the `Connection` header names
pub fn remove_hop_headers(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in named {
        headers.remove(name);
    }
    for name in HOP_HEADERS {
        headers.remove(name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, client_ip: IpAddr) {
    let prior: Vec<&str> = headers.get_all(X_FORWARDED_FOR).iter().filter_map(|v| v.to_str().ok()).collect();
    let value = if prior.is_empty() { client_ip.to_string() } else { format!("{}, {}", prior.join(", "), client_ip) };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

fn bad_gateway(err: &TransportError) -> Response<Body> {
    let mut response = Response::new(Body::from(err.to_string()));
    *response.status_mut() = StatusCode::BAD_GATEWAY;
    response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}
