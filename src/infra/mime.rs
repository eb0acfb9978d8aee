//! File-extension based MIME detection for attachments.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guesses a MIME type from a file extension (case-insensitive).
pub fn mime_for_ext(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "json" => "application/json",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => OCTET_STREAM,
    }
}

/// MIME type for `path`, or `application/octet-stream` without an extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(OCTET_STREAM, mime_for_ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_are_detected_case_insensitively() {
        assert_eq!(mime_for_path(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("icon.svg")), "image/svg+xml");
    }

    #[test]
    fn unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(mime_for_path(Path::new("archive.xyz")), OCTET_STREAM);
        assert_eq!(mime_for_path(Path::new("Makefile")), OCTET_STREAM);
    }
}
