//! Content type detection from leading bytes.

/// Fallback for unrecognized content
pub const OCTET_STREAM: &str = "application/octet-stream";

/// How far into a text file the `<svg` tag is searched for
const SVG_SNIFF_LEN: usize = 512;

/// Detects the MIME type of `data` by examining its magic bytes
///
/// The file name plays no part; unknown content is [`OCTET_STREAM`].
pub fn detect_content_type(data: &[u8]) -> &'static str {
    match data {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        // GIF87a / GIF89a
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        // WEBP: RIFF .... WEBP
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        // BMP: 42 4D
        [0x42, 0x4D, ..] => "image/bmp",
        // ICO: 00 00 01 00
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        // TIFF, little and big endian
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => "image/tiff",
        _ if is_svg(data) => "image/svg+xml",
        _ => OCTET_STREAM,
    }
}

fn is_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(SVG_SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    let text = text
        .trim_start_matches('\u{feff}')
        .trim_start()
        .to_ascii_lowercase();

    (text.starts_with("<svg") || text.starts_with("<?xml") || text.starts_with("<!--"))
        && text.contains("<svg")
}
