//! Input resolution: read the carousel markdown from disk.
//!
//! Failures are mapped onto distinct [`CarouselError`] variants so the CLI
//! can tell a missing file from a permissions problem, a binary file, or any
//! other read failure (which keeps its `io::Error`).

use crate::error::CarouselError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read the whole document as UTF-8 text.
pub fn read_document(path: &Path) -> Result<String, CarouselError> {
    if !path.exists() {
        return Err(CarouselError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(CarouselError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(CarouselError::InvalidEncoding {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CarouselError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(CarouselError::InputReadFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_utf8_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "## CAROUSEL SLIDES").unwrap();
        let text = read_document(f.path()).unwrap();
        assert!(text.starts_with("## CAROUSEL"));
    }

    #[test]
    fn missing_file() {
        let err = read_document(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, CarouselError::InputNotFound { .. }));
    }

    #[test]
    fn directory_is_a_read_failure_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(dir.path()).unwrap_err();
        assert!(
            matches!(err, CarouselError::InputReadFailed { .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn non_utf8_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();
        let err = read_document(f.path()).unwrap_err();
        assert!(matches!(err, CarouselError::InvalidEncoding { .. }));
    }
}
