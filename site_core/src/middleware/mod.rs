//! Middleware components for the site server

pub mod cors;
pub mod logging;
pub mod rate_limit;
