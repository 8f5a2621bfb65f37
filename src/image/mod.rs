//! Inbound image handling
//!
//! Field photos arrive as data URLs. Only the encoded payload is extracted
//! here; whether it is valid base64 or a real image is left to the provider.

pub mod data_url;

pub use data_url::{decode_data_url, ImagePayload};

/// Mime type announced to the provider for every upload, whatever the
/// data-URL header claims.
pub const UPLOAD_MIME_TYPE: &str = "image/jpeg";
