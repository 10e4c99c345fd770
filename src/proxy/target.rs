use crate::error::{TransportError, UpstreamError};
use crate::utils::path::{join_query, single_joining_slash};
use crate::utils::validation::validate_dial_port;
use hyper::{Body, Request, Uri};
use std::fmt;

/// The single upstream a proxy forwards to.
///
/// Kept as plain parts rather than a parsed `Uri` so that a target with an
/// unusable port still constructs; the problem is reported when a request is
/// actually dialed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    scheme: String,
    authority: String,
    path: String,
    query: Option<String>,
}

impl UpstreamTarget {
    pub fn parse(url: &str) -> Result<Self, UpstreamError> {
        let (scheme, rest) = url.trim().split_once("://").ok_or_else(|| UpstreamError::MissingScheme(url.to_string()))?;
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(UpstreamError::UnsupportedScheme(scheme));
        }

        let rest = rest.split('#').next().unwrap_or_default();
        let (authority, path_and_query) = rest.split_at(rest.find(['/', '?']).unwrap_or(rest.len()));
        if authority.is_empty() {
            return Err(UpstreamError::MissingHost(url.to_string()));
        }
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (path_and_query, None),
        };

        Ok(Self { scheme, authority: authority.to_string(), path: path.to_string(), query })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Point `req` at the upstream, keeping its method, headers and body
    pub fn rewrite(&self, req: Request<Body>) -> Result<Request<Body>, TransportError> {
        validate_dial_port(&self.authority)?;

        let (mut parts, body) = req.into_parts();
        let path = single_joining_slash(&self.path, parts.uri.path());
        let path_and_query = match join_query(self.query.as_deref(), parts.uri.query()) {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };
        parts.uri = Uri::builder().scheme(self.scheme.as_str()).authority(self.authority.as_str()).path_and_query(path_and_query).build()?;

        Ok(Request::from_parts(parts, body))
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}
