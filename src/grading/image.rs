use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use image::ImageFormat;

use super::GradingError;

/// Standard alphabet; browsers and phone uploads disagree on padding.
const UPLOAD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An uploaded image, ready to attach to an upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64 body without any data-URI header or whitespace.
    pub base64: String,
    pub mime_type: String,
    pub decoded_len: usize,
}

impl ImagePayload {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Split an optional `data:<mime>;base64,` header off `raw`.
///
/// Returns the declared mime type (if any) and the remaining base64 text.
pub fn strip_data_uri(raw: &str) -> (Option<&str>, &str) {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("data:") {
        if let Some((header, body)) = rest.split_once(',') {
            let mime = header.split(';').next().unwrap_or_default().trim();
            let mime = if mime.is_empty() { None } else { Some(mime) };
            return (mime, body);
        }
    }
    (None, trimmed)
}

/// Validate an uploaded image and normalize it for the upstream model.
pub fn prepare_image(raw: &str, max_bytes: usize) -> Result<ImagePayload, GradingError> {
    let (declared_mime, body) = strip_data_uri(raw);

    if let Some(mime) = declared_mime {
        if !mime.starts_with("image/") {
            return Err(GradingError::InvalidRequest(format!(
                "Unsupported upload type '{}', please upload an image file",
                mime
            )));
        }
    }

    let base64: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if base64.is_empty() {
        return Err(GradingError::InvalidRequest("No image provided".to_string()));
    }

    let bytes = UPLOAD_BASE64
        .decode(base64.as_bytes())
        .map_err(|e| GradingError::InvalidRequest(format!("Image is not valid base64: {}", e)))?;

    if bytes.len() > max_bytes {
        return Err(GradingError::InvalidRequest(format!(
            "Image is {} bytes, the limit is {} bytes",
            bytes.len(),
            max_bytes
        )));
    }

    let sniffed = image::guess_format(&bytes)
        .ok()
        .and_then(mime_for_format)
        .ok_or_else(|| GradingError::InvalidRequest("Unrecognised image format".to_string()))?;

    Ok(ImagePayload {
        base64,
        mime_type: declared_mime.unwrap_or(sniffed).to_string(),
        decoded_len: bytes.len(),
    })
}

fn mime_for_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG.
    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn strips_data_uri_header() {
        let (mime, body) = strip_data_uri("data:image/jpeg;base64,QUJD");
        assert_eq!(mime, Some("image/jpeg"));
        assert_eq!(body, "QUJD");

        let (mime, body) = strip_data_uri("  QUJD ");
        assert_eq!(mime, None);
        assert_eq!(body, "QUJD");
    }

    #[test]
    fn sniffs_png_without_prefix() {
        let payload = prepare_image(PNG_1X1, 1024).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.base64, PNG_1X1);
        assert!(payload.data_uri().starts_with("data:image/png;base64,iVBOR"));
    }

    #[test]
    fn keeps_declared_mime_and_drops_whitespace() {
        let raw = format!("data:image/png;base64,{}\n{}", &PNG_1X1[..20], &PNG_1X1[20..]);
        let payload = prepare_image(&raw, 1024).unwrap();
        assert_eq!(payload.base64, PNG_1X1);
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn rejects_non_image_uploads() {
        let err = prepare_image("data:application/pdf;base64,JVBERi0=", 1024).unwrap_err();
        assert!(matches!(err, GradingError::InvalidRequest(_)));

        // Valid base64, but "hello" is not an image.
        let err = prepare_image("aGVsbG8=", 1024).unwrap_err();
        assert!(matches!(err, GradingError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_bad_base64_and_oversized_images() {
        assert!(matches!(
            prepare_image("not base64 at all!", 1024),
            Err(GradingError::InvalidRequest(_))
        ));
        assert!(matches!(
            prepare_image(PNG_1X1, 16),
            Err(GradingError::InvalidRequest(_))
        ));
        assert!(matches!(
            prepare_image("data:image/png;base64,", 1024),
            Err(GradingError::InvalidRequest(_))
        ));
    }
}
