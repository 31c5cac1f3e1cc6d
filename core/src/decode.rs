use crate::{KwgError, Result};
use std::fs;
use std::path::Path;

/// Text encodings tried when reading source files, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

pub const ENCODING_PRIORITY: [Encoding; 4] = [Encoding::Utf8, Encoding::Utf16Le, Encoding::Utf16Be, Encoding::Latin1];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl Encoding {
    /// Strict decode: `None` when the bytes are not valid in this encoding
    /// or the decoded text contains NUL, which marks binary content.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let text = match self {
            Encoding::Utf8 => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            Encoding::Utf16Le => decode_utf16(bytes.strip_prefix(&[0xFF, 0xFE])?, u16::from_le_bytes),
            Encoding::Utf16Be => decode_utf16(bytes.strip_prefix(&[0xFE, 0xFF])?, u16::from_be_bytes),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }?;
        if text.contains('\0') { None } else { Some(text) }
    }
}

/// UTF-16 is only attempted when a byte-order mark says so.
fn decode_utf16(body: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if body.len() % 2 != 0 { return None; }
    let units = body.chunks_exact(2).map(|c| to_unit([c[0], c[1]]));
    char::decode_utf16(units).collect::<std::result::Result<String, _>>().ok()
}

/// Returns the first successful decode along with the encoding that produced it.
pub fn decode(bytes: &[u8]) -> Option<(String, Encoding)> {
    ENCODING_PRIORITY
        .iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (text, *enc)))
}

/// Reads and decodes a file; `KwgError::Decode` when no encoding fits.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    match decode(&bytes) {
        Some((text, encoding)) => {
            tracing::debug!(path = %path.display(), ?encoding, "decoded file");
            Ok(text)
        }
        None => Err(KwgError::Decode { path: path.to_path_buf() }),
    }
}
