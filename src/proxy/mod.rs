// Proxy module
//
// This module contains the reverse proxy split into focused submodules:
// - target: the single upstream and how inbound requests are rewritten for it
// - request_handler: forwarding and mapping transport failures to 502
// - deadline: caller-side wall-clock budget answering 503
// - http_server: listener wiring a proxy to a socket

pub mod deadline;
pub mod http_server;
pub mod request_handler;
pub mod target;

pub use deadline::Deadline;
pub use http_server::start_rp_server;
pub use request_handler::ReverseProxy;
pub use target::UpstreamTarget;
