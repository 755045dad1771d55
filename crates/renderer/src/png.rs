//! PNG encoding for RGBA image data (color type 6) with `tEXt` metadata.

use std::io::Write;

use tiny_skia::Pixmap;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image from straight (non-premultiplied) RGBA pixel data.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `text`: `(keyword, value)` pairs written as `tEXt` chunks
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    text: &[(&str, &str)],
) -> Result<Vec<u8>, String> {
    if width == 0 || height == 0 {
        return Err(format!("invalid image size {}x{}", width, height));
    }
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "pixel buffer has {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        ));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    for (keyword, value) in text {
        write_chunk(&mut png, b"tEXt", &text_chunk(keyword, value)?);
    }

    let idat_data = deflate_idat_rgba(pixels, width, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode a tiny-skia pixmap, converting from premultiplied alpha.
pub fn encode_pixmap(pixmap: &Pixmap, text: &[(&str, &str)]) -> Result<Vec<u8>, String> {
    let mut pixels = Vec::with_capacity(pixmap.data().len());
    for p in pixmap.pixels() {
        let c = p.demultiply();
        pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    create_png(
        &pixels,
        pixmap.width() as usize,
        pixmap.height() as usize,
        text,
    )
}

/// Build a `tEXt` payload: Latin-1 keyword (1-79 bytes), NUL, text.
fn text_chunk(keyword: &str, value: &str) -> Result<Vec<u8>, String> {
    if keyword.is_empty() || keyword.len() > 79 || !keyword.bytes().all(|b| (32..=126).contains(&b))
    {
        return Err(format!("invalid tEXt keyword {:?}", keyword));
    }
    let mut data = Vec::with_capacity(keyword.len() + 1 + value.len());
    data.extend_from_slice(keyword.as_bytes());
    data.push(0);
    // tEXt is Latin-1; anything outside it is replaced.
    data.extend(value.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')));
    Ok(data)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA image data for IDAT chunk.
fn deflate_idat_rgba(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    // Filter byte 0 (none) before every scanline
    let mut uncompressed = Vec::with_capacity(height * (1 + width * 4));
    for row in pixels.chunks_exact(width * 4).take(height) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&uncompressed)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_and_chunk_order() {
        let pixels = [255, 0, 0, 255, 0, 255, 0, 255];
        let png = create_png(&pixels, 2, 1, &[("Title", "Floor 1")]).unwrap();
        assert_eq!(&png[0..8], &SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        // IHDR is 13 bytes + 12 bytes framing, tEXt follows.
        assert_eq!(&png[37..41], b"tEXt");
    }

    #[test]
    fn test_rejects_bad_buffer() {
        assert!(create_png(&[0; 7], 2, 1, &[]).is_err());
        assert!(create_png(&[], 0, 0, &[]).is_err());
    }

    #[test]
    fn test_text_chunk_payload() {
        let data = text_chunk("Title", "Floor 1 – Ping").unwrap();
        assert!(data.starts_with(b"Title\0Floor 1 "));
        assert_eq!(data[data.len() - 6], b'?');
        assert!(text_chunk("", "x").is_err());
        assert!(text_chunk("bad\nkey", "x").is_err());
    }
}
