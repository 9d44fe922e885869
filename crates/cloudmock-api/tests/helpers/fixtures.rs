//! Test fixtures: image-like blobs of a chosen size.

/// PNG signature followed by deterministic filler up to `len` bytes.
pub fn png_bytes(len: usize) -> Vec<u8> {
    const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    with_header(&SIGNATURE, len)
}

/// JPEG SOI/APP0 marker followed by deterministic filler up to `len` bytes.
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    const SOI: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    with_header(&SOI, len)
}

/// Minimal PDF header.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n"
        .to_vec()
}

fn with_header(header: &[u8], len: usize) -> Vec<u8> {
    let mut data: Vec<u8> = header.iter().copied().take(len).collect();
    data.extend((data.len()..len).map(|i| (i % 251) as u8));
    data
}

