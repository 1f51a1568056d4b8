//! Local text files with an ordered encoding fallback.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{SourceError, SourceResult};

/// A text encoding tried when reading a local file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

/// Decoders in the order they are tried; the first success wins.
pub const DECODERS: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decode `bytes` with the first decoder in `decoders` that accepts them.
pub fn decode_with(bytes: &[u8], decoders: &[TextEncoding]) -> Option<(TextEncoding, String)> {
    decoders
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
}

/// Read a local file as text, falling back through [`DECODERS`].
pub async fn read_text_file(path: impl AsRef<Path>) -> SourceResult<String> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => SourceError::FileNotFound(path.to_path_buf()),
        _ => SourceError::Io(e),
    })?;

    let (encoding, text) =
        decode_with(&bytes, &DECODERS).ok_or_else(|| SourceError::Decode(path.to_path_buf()))?;
    if encoding != TextEncoding::Utf8 {
        warn!(path = %path.display(), ?encoding, "File is not UTF-8, decoded with fallback");
    }
    debug!(path = %path.display(), bytes = bytes.len(), "Read local file");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_utf8_exactly() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let content = "Grüße aus München\nzweite Zeile\n";
        file.write_all(content.as_bytes()).unwrap();

        let text = read_text_file(file.path()).await.unwrap();
        assert_eq!(text, content);
    }

    #[tokio::test]
    async fn test_falls_back_to_latin1() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "Größe" in ISO-8859-1; 0xF6 and 0xDF are invalid as UTF-8 here
        file.write_all(&[0x47, 0x72, 0xF6, 0xDF, 0x65]).unwrap();

        let text = read_text_file(file.path()).await.unwrap();
        assert_eq!(text, "Größe");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text_file(dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn test_decoder_order_stops_at_first_success() {
        let (encoding, text) = decode_with("plain".as_bytes(), &DECODERS).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(text, "plain");

        assert!(decode_with(&[0xFF], &[TextEncoding::Utf8]).is_none());
    }
}
