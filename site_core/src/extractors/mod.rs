pub mod client_ip;
pub mod json;

pub use client_ip::ClientIp;
pub use json::{FormJson, FormJsonRejection};
