//! MIME type sniffing from leading bytes.

/// Fallback for content that matches no known signature.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Infer a MIME type from the first bytes of a payload.
///
/// Recognizes the common web image formats. Anything else is reported as
/// `text/html` for HTML documents (error pages, for instance), `text/plain`
/// for other text and `application/octet-stream` otherwise.
pub fn sniff_mime(data: &[u8]) -> &'static str {
    let header = &data[..data.len().min(16)];

    // JPEG: FF D8 FF
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }

    // GIF87a / GIF89a
    if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
        return "image/gif";
    }

    // WebP: RIFF....WEBPVP
    if header.len() >= 14 && header.starts_with(b"RIFF") && &header[8..14] == b"WEBPVP" {
        return "image/webp";
    }

    // BMP: BM
    if header.starts_with(b"BM") {
        return "image/bmp";
    }

    // ICO / CUR
    if header.starts_with(&[0x00, 0x00, 0x01, 0x00]) || header.starts_with(&[0x00, 0x00, 0x02, 0x00])
    {
        return "image/x-icon";
    }

    // TIFF: II*\0 or MM\0*
    if header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return "image/tiff";
    }

    // AVIF: ftyp box at offset 4 with an avif brand
    if header.len() >= 12
        && &header[4..8] == b"ftyp"
        && matches!(&header[8..12], b"avif" | b"avis")
    {
        return "image/avif";
    }

    let sample = &data[..data.len().min(512)];
    if looks_like_html(sample) {
        return "text/html";
    }
    if looks_like_text(sample) {
        return "text/plain";
    }

    OCTET_STREAM
}

/// File extension (without the dot) for a sniffed MIME type.
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/x-icon" => "ico",
        "image/tiff" => "tiff",
        "image/avif" => "avif",
        "text/html" => "html",
        "text/plain" => "txt",
        _ => "bin",
    }
}

/// Whether the MIME type names an image format.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Tags that open an HTML document, matched case-insensitively after leading
/// whitespace and followed by a space or `>`.
const HTML_PREFIXES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<BODY",
    b"<SCRIPT",
    b"<TITLE",
    b"<STYLE",
    b"<IFRAME",
    b"<TABLE",
    b"<DIV",
    b"<H1",
    b"<P",
    b"<!--",
];

fn looks_like_html(sample: &[u8]) -> bool {
    let start = sample
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(sample.len());
    let sample = &sample[start..];

    HTML_PREFIXES.iter().any(|prefix| {
        sample.len() > prefix.len()
            && sample[..prefix.len()].eq_ignore_ascii_case(prefix)
            && matches!(sample[prefix.len()], b' ' | b'>')
    })
}

fn looks_like_text(sample: &[u8]) -> bool {
    !sample.is_empty()
        && sample
            .iter()
            .all(|&b| b == b'\t' || b == b'\n' || b == b'\r' || b == 0x0C || b >= 0x20)
}
