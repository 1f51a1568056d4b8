//! SSRF protection: address classification and URL validation.

mod classify;
mod validator;

pub use classify::AddressClass;
pub use validator::{UrlValidator, ValidatedUrl};
