/// Used when the extension is missing or not in the table.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Infer an image MIME type from a filename extension (case-insensitive).
pub fn image_mime_type(filename: Option<&str>) -> &'static str {
    let name = filename.map(str::to_ascii_lowercase);
    let ext = name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext);

    match ext {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => DEFAULT_IMAGE_MIME,
    }
}

/// Build a `data:` URL embedding the MIME type and base64 payload.
pub fn data_url(mime_type: &str, base64_payload: &str) -> String {
    format!("data:{mime_type};base64,{base64_payload}")
}
