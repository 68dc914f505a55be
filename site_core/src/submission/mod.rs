//! Delivery of lead form submissions to the remote backend

pub mod client;
pub mod error;
pub mod rate_limit;
pub mod transport;

pub use client::SubmissionClient;
pub use error::SubmissionError;
pub use rate_limit::RateLimitState;
pub use transport::{FormTransport, OutboundRequest, ReqwestTransport, TransportError, TransportResponse};
