//! Raw documents and the loader seam.
//!
//! Binary formats are decoded outside this crate. [`PlainTextLoader`] covers
//! `.txt` files so the pipeline can be driven end to end from disk.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DocumentLoadError;

/// Default upper bound on input size (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Immutable contract text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    text: String,
    provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub filename: Option<String>,
    pub byte_length: usize,
    pub encoding: TextEncoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }

    /// Wrap in-memory UTF-8 text with no filename.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let provenance = Provenance {
            filename: None,
            byte_length: text.len(),
            encoding: TextEncoding::Utf8,
        };
        Self { text, provenance }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

/// Supplies decoded, encoding-normalized contract text.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<RawDocument, DocumentLoadError>;
}

/// Loads `.txt` files, detecting UTF-8, UTF-16 (by BOM) or falling back to Latin-1.
#[derive(Debug, Clone)]
pub struct PlainTextLoader {
    max_size: u64,
}

impl Default for PlainTextLoader {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl PlainTextLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }
}

impl DocumentLoader for PlainTextLoader {
    fn load(&self, path: &Path) -> Result<RawDocument, DocumentLoadError> {
        if !path.exists() {
            return Err(DocumentLoadError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if extension != "txt" {
            return Err(DocumentLoadError::UnsupportedFormat {
                extension,
                supported: ".txt".to_string(),
            });
        }

        let io_err = |source| DocumentLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(io_err)?.len();
        if size > self.max_size {
            return Err(DocumentLoadError::TooLarge {
                size,
                limit: self.max_size,
            });
        }

        let bytes = fs::read(path).map_err(io_err)?;
        let (decoded, encoding) = decode(&bytes);
        let text = decoded.replace("\r\n", "\n").replace('\r', "\n");

        tracing::debug!(
            bytes = bytes.len(),
            encoding = ?encoding,
            "loaded plain-text document"
        );

        Ok(RawDocument::new(
            text,
            Provenance {
                filename: path.file_name().map(|n| n.to_string_lossy().into_owned()),
                byte_length: bytes.len(),
                encoding,
            },
        ))
    }
}

fn decode(bytes: &[u8]) -> (String, TextEncoding) {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return (String::from_utf8_lossy(rest).into_owned(), TextEncoding::Utf8);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return (decode_utf16(rest, u16::from_le_bytes), TextEncoding::Utf16Le);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return (decode_utf16(rest, u16::from_be_bytes), TextEncoding::Utf16Be);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        // Every byte is a valid Latin-1 code point.
        Err(_) => (
            bytes.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Latin1,
        ),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_utf8_and_normalizes_newlines() {
        let (_dir, path) = write_temp("lease.txt", b"1. Rent\r\n2. Deposit\r\n");
        let doc = PlainTextLoader::new().load(&path).unwrap();
        assert_eq!(doc.text(), "1. Rent\n2. Deposit\n");
        assert_eq!(doc.provenance().filename.as_deref(), Some("lease.txt"));
        assert_eq!(doc.provenance().byte_length, 22);
        assert_eq!(doc.provenance().encoding, TextEncoding::Utf8);
    }

    #[test]
    fn strips_utf8_bom() {
        let (_dir, path) = write_temp("bom.txt", b"\xEF\xBB\xBFTerm");
        let doc = PlainTextLoader::new().load(&path).unwrap();
        assert_eq!(doc.text(), "Term");
    }

    #[test]
    fn decodes_utf16_le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Fee ₹5".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (_dir, path) = write_temp("wide.txt", &bytes);
        let doc = PlainTextLoader::new().load(&path).unwrap();
        assert_eq!(doc.text(), "Fee ₹5");
        assert_eq!(doc.provenance().encoding, TextEncoding::Utf16Le);
    }

    #[test]
    fn falls_back_to_latin1() {
        let (_dir, path) = write_temp("legacy.txt", b"caf\xE9");
        let doc = PlainTextLoader::new().load(&path).unwrap();
        assert_eq!(doc.text(), "café");
        assert_eq!(doc.provenance().encoding, TextEncoding::Latin1);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let (_dir, path) = write_temp("contract.pdf", b"%PDF");
        let err = PlainTextLoader::new().load(&path).unwrap_err();
        assert!(matches!(
            err,
            DocumentLoadError::UnsupportedFormat { ref extension, .. } if extension == "pdf"
        ));
    }

    #[test]
    fn rejects_oversize_file() {
        let (_dir, path) = write_temp("big.txt", &[b'a'; 64]);
        let err = PlainTextLoader::new()
            .with_max_size(16)
            .load(&path)
            .unwrap_err();
        assert!(matches!(err, DocumentLoadError::TooLarge { size: 64, limit: 16 }));
    }

    #[test]
    fn reports_missing_file() {
        let err = PlainTextLoader::new()
            .load(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, DocumentLoadError::NotFound(_)));
    }
}
