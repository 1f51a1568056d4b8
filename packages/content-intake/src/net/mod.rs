//! Network-backed collaborators: system DNS and the reqwest transport.

mod http;
mod resolver;

pub use http::{ReqwestTransport, MAX_BODY_BYTES, REQUEST_TIMEOUT};
pub use resolver::SystemResolver;
