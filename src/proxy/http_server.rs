use crate::proxy::deadline::Deadline;
use crate::proxy::request_handler::ReverseProxy;
use crate::transport::RoundTrip;
use anyhow::Result;
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response};
use log::{info, warn};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Serve `proxy` on `addr` until Ctrl-C is received
pub async fn start_rp_server<T>(addr: SocketAddr, proxy: Arc<ReverseProxy<T>>, deadline: Option<Deadline>) -> Result<()>
where
    T: RoundTrip + 'static,
{
    let make_svc = make_service_fn(move |conn: &AddrStream| {
        let remote_addr = conn.remote_addr().ip();
        let proxy = proxy.clone();
        let deadline = deadline.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let proxy = proxy.clone();
                let deadline = deadline.clone();
                async move { Ok::<_, Infallible>(dispatch(&*proxy, deadline.as_ref(), remote_addr, req).await) }
            }))
        }
    });

    let server = hyper::Server::try_bind(&addr)?.serve(make_svc);
    info!("Reverse Proxy Server running on {}", server.local_addr());

    server.with_graceful_shutdown(shutdown_signal()).await?;
    info!("Reverse Proxy Server stopped");
    Ok(())
}

/// Run one request through the proxy, under the deadline when one is configured
pub async fn dispatch<T: RoundTrip>(proxy: &ReverseProxy<T>, deadline: Option<&Deadline>, client_ip: IpAddr, req: Request<Body>) -> Response<Body> {
    match deadline {
        Some(deadline) => deadline.run(proxy.handle(Some(client_ip), req)).await,
        None => proxy.handle(Some(client_ip), req).await,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
