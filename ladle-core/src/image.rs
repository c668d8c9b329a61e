//! Image validation and display URL resolution.
//!
//! Validation is shared by the upload endpoint and the CLI (which checks a
//! file before sending it). URL resolution turns a stored image reference into
//! something a browser or terminal can open.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::error::CoreError;

/// Allowed image formats for uploads.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum upload size (5MB).
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Shown whenever a recipe has no image or its image fails to load.
pub const PLACEHOLDER_IMAGE: &str = "/images/recipe-placeholder.svg";

/// Path prefix under which the server exposes stored uploads.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Validate image data: check size and format, detect content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, CoreError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(CoreError::ImageTooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CoreError::InvalidImage(format!("failed to read image: {}", e)))?;

    let format = reader
        .format()
        .ok_or_else(|| CoreError::InvalidImage("could not detect image format".to_string()))?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(CoreError::InvalidImage(format!(
            "unsupported format {:?}, allowed: JPEG, PNG, GIF, WebP",
            format
        )));
    }

    Ok(format.to_mime_type().to_string())
}

/// True when the reference already carries a URL scheme and must not be
/// prefixed with the API base.
pub fn is_absolute_url(reference: &str) -> bool {
    if reference.starts_with("//") {
        return true;
    }

    let Some((scheme, rest)) = reference.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid_scheme && (rest.starts_with("//") || matches!(scheme, "data" | "blob"))
}

/// Resolve a stored image reference to a display URL.
///
/// Exactly one `/` separates `base` and a relative reference, whether or not
/// either side already carries one.
pub fn resolve_image_url(base: &str, reference: Option<&str>) -> String {
    let reference = match reference.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return PLACEHOLDER_IMAGE.to_string(),
    };

    if is_absolute_url(reference) {
        return reference.to_string();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

/// The URL to substitute when a resolved image fails to load.
pub fn fallback_image_url() -> &'static str {
    PLACEHOLDER_IMAGE
}

/// Stored path for an upload id, as returned by the upload endpoint.
pub fn upload_path(id: impl std::fmt::Display) -> String {
    format!("{}/{}", UPLOADS_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 PNG
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_validate_png() {
        assert_eq!(validate_image(TINY_PNG).unwrap(), "image/png");
    }

    #[test]
    fn test_validate_rejects_text() {
        let err = validate_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CoreError::InvalidImage(_)));
    }

    #[test]
    fn test_validate_rejects_oversized() {
        let data = vec![0u8; MAX_FILE_SIZE + 1];
        assert_eq!(
            validate_image(&data).unwrap_err(),
            CoreError::ImageTooLarge {
                size: MAX_FILE_SIZE + 1,
                max: MAX_FILE_SIZE
            }
        );
    }

    #[test]
    fn test_absolute_detection() {
        assert!(is_absolute_url("http://x/y.jpg"));
        assert!(is_absolute_url("https://cdn.example.com/a.png"));
        assert!(is_absolute_url("//cdn.example.com/a.png"));
        assert!(is_absolute_url("data:image/png;base64,AAAA"));
        assert!(!is_absolute_url("/uploads/a.jpg"));
        assert!(!is_absolute_url("uploads/a.jpg"));
        assert!(!is_absolute_url("uploads/10:30.jpg"));
    }

    #[test]
    fn test_whitespace_reference_is_placeholder() {
        assert_eq!(resolve_image_url("http://api", Some("   ")), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_trailing_slash_on_base() {
        assert_eq!(
            resolve_image_url("http://api/", Some("/uploads/a.jpg")),
            "http://api/uploads/a.jpg"
        );
    }

    #[test]
    fn test_upload_path() {
        assert_eq!(upload_path("abc"), "/uploads/abc");
    }
}
