//! QR badge generation.
//!
//! Badges encode a small JSON envelope (`{"uniqueId": "..."}`) so scanners can
//! tell a badge apart from an arbitrary QR code.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Luma};
use qrcode::QrCode;

use crate::error::QrError;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// JSON envelope encoded into an attendee's badge.
pub fn qr_payload(unique_id: &str) -> String {
    serde_json::json!({ "uniqueId": unique_id }).to_string()
}

/// Renders `data` as a PNG QR code.
pub fn render_png(data: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
    let image = code.render::<Luma<u8>>().build();

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renders `data` as a PNG data URI.
///
/// Returns an empty string when the payload cannot be encoded; callers treat
/// that as "no QR available" and carry on.
pub fn generate_qr_code(data: &str) -> String {
    match render_png(data) {
        Ok(bytes) => format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(bytes)),
        Err(e) => {
            tracing::error!("Error generating QR code: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_json_envelope() {
        let payload = qr_payload("1b4e28ba-2fa1-11d2-883f-0016d3cca427");
        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["uniqueId"], "1b4e28ba-2fa1-11d2-883f-0016d3cca427");
    }

    #[test]
    fn test_render_png_has_png_signature() {
        let bytes = render_png(&qr_payload("abc")).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_generate_data_uri() {
        let uri = generate_qr_code(&qr_payload("abc"));
        assert!(uri.starts_with(DATA_URI_PREFIX));
        let decoded = STANDARD.decode(&uri[DATA_URI_PREFIX.len()..]).unwrap();
        assert_eq!(&decoded[..4], b"\x89PNG");
    }

    #[test]
    fn test_oversized_payload_yields_empty() {
        let payload = "x".repeat(10_000);
        assert!(render_png(&payload).is_err());
        assert_eq!(generate_qr_code(&payload), "");
    }
}
