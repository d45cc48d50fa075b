//! Base64 payload codec and MIME type detection.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;

pub const WORD_DOCUMENT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Encode binary content for a JSON envelope.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 from a JSON envelope. Embedded whitespace and line breaks are ignored.
pub fn decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

/// Whether the content starts with a local ZIP file header (OOXML packages do).
pub fn looks_like_zip(data: &[u8]) -> bool {
    data.starts_with(ZIP_SIGNATURE)
}

/// Document extensions we know a MIME type for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileExtension {
    Txt,
    Html,
    Xml,
    Json,
    Csv,
    Md,
    Docx,
    Pdf,
    Unknown,
}

impl FileExtension {
    /// Get MIME type for this extension.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::Txt => Some("text/plain"),
            Self::Html => Some("text/html"),
            Self::Xml => Some("application/xml"),
            Self::Json => Some("application/json"),
            Self::Csv => Some("text/csv"),
            Self::Md => Some("text/markdown"),
            Self::Docx => Some(WORD_DOCUMENT_MIME),
            Self::Pdf => Some("application/pdf"),
            Self::Unknown => None,
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Self::Txt,
            "html" | "htm" => Self::Html,
            "xml" => Self::Xml,
            "json" => Self::Json,
            "csv" => Self::Csv,
            "md" | "markdown" => Self::Md,
            "docx" => Self::Docx,
            "pdf" => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    pub fn from_filename(filename: &str) -> Self {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

/// Detect MIME type from an object name.
pub fn detect_mime_type(filename: &str) -> Option<&'static str> {
    FileExtension::from_filename(filename).mime_type()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ignores_whitespace() {
        let encoded = encode(b"hello world");
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        assert_eq!(decode(&wrapped).unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not base64!!").is_err());
    }

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type("out/letter.TXT"), Some("text/plain"));
        assert_eq!(detect_mime_type("report.docx"), Some(WORD_DOCUMENT_MIME));
        assert_eq!(detect_mime_type("data.json"), Some("application/json"));
        assert_eq!(detect_mime_type("no_extension"), None);
        assert_eq!(detect_mime_type("archive.bin"), None);
    }

    #[test]
    fn test_looks_like_zip() {
        assert!(looks_like_zip(b"PK\x03\x04rest"));
        assert!(!looks_like_zip(b"%PDF-1.7"));
        assert!(!looks_like_zip(b""));
    }
}
