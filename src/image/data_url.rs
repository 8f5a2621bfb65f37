use crate::{Error, Result};

/// Encoded image extracted from a `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Mime type from the header, if the header named one.
    pub declared_mime: Option<String>,
    /// Base64 text after the first comma, untouched.
    pub data: String,
}

/// Split a data URL on its first comma.
///
/// Fails with [`Error::InvalidImageFormat`] when there is no comma or nothing
/// follows it.
pub fn decode_data_url(image_data: &str) -> Result<ImagePayload> {
    let (header, payload) = image_data
        .split_once(',')
        .ok_or(Error::InvalidImageFormat)?;

    if payload.is_empty() {
        return Err(Error::InvalidImageFormat);
    }

    Ok(ImagePayload {
        declared_mime: declared_mime(header),
        data: payload.to_string(),
    })
}

fn declared_mime(header: &str) -> Option<String> {
    let media = header.strip_prefix("data:").unwrap_or(header);
    let mime = media.split(';').next().unwrap_or("").trim();
    (!mime.is_empty()).then(|| mime.to_string())
}
