// LedgerSift - platform/fs.rs
//
// Input file reading: size guard plus the two text encodings the bank
// exports arrive in.

use crate::util::error::IngestError;
use std::path::Path;

/// Fail with `FileTooLarge` when `path` exceeds `max_size` bytes.
pub fn ensure_within_size(path: &Path, max_size: u64) -> Result<u64, IngestError> {
    let size = std::fs::metadata(path)
        .map_err(|e| IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();
    if size > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }
    Ok(size)
}

/// Read the full content of a file as UTF-8.
///
/// Invalid sequences are replaced rather than rejected.
pub fn read_file_lossy(path: &Path) -> Result<String, IngestError> {
    let bytes = read_bytes(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read the full content of a file as Latin-1 (ISO-8859-1).
///
/// Every byte maps to the code point of the same value, so decoding never fails.
/// A leading UTF-8 byte order mark is dropped before decoding, otherwise it
/// would reach the header as `ï»¿`.
pub fn read_file_latin1(path: &Path) -> Result<String, IngestError> {
    let bytes = read_bytes(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
    Ok(decode_latin1(body))
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn read_bytes(path: &Path) -> Result<Vec<u8>, IngestError> {
    std::fs::read(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"Caf\xe9,\xa3"), "Café,£");
        assert_eq!(decode_latin1(b"plain"), "plain");
    }

    #[test]
    fn test_latin1_strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.csv");
        std::fs::write(&path, b"\xEF\xBB\xBFGL_Code,Product_Code\n300016,CR\xc9\n").unwrap();
        assert_eq!(
            read_file_latin1(&path).unwrap(),
            "GL_Code,Product_Code\n300016,CRÉ\n"
        );
    }

    #[test]
    fn test_latin1_keeps_bom_like_bytes_mid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.csv");
        std::fs::write(&path, b"a,\xEF\xBB\xBF\n").unwrap();
        assert_eq!(read_file_latin1(&path).unwrap(), "a,\u{ef}\u{bb}\u{bf}\n");
    }

    #[test]
    fn test_size_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, b"0123456789").unwrap();

        assert_eq!(ensure_within_size(&path, 10).unwrap(), 10);
        assert!(matches!(
            ensure_within_size(&path, 9),
            Err(IngestError::FileTooLarge { size: 10, max_size: 9, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_file_lossy(Path::new("/nonexistent/ledgersift/raw.csv"));
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }

    #[test]
    fn test_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        std::fs::write(&path, b"a,\xff,c").unwrap();
        assert_eq!(read_file_lossy(&path).unwrap(), "a,\u{fffd},c");
    }
}
