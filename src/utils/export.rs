use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::utils::codegen::CodeFile;

/// Write a generated file into `dir` under its own name. Returns the full path.
///
/// The name must be a single plain path component; anything that could land
/// outside `dir` is rejected before the filesystem is touched.
pub fn write_code_file(file: &CodeFile, dir: &Path) -> Result<PathBuf, AppError> {
    check_file_name(&file.filename)?;

    fs::create_dir_all(dir)
        .map_err(|e| AppError::FileWrite(format!("Cannot create {}: {}", dir.display(), e)))?;

    let path = dir.join(&file.filename);
    fs::write(&path, file.code.as_bytes())
        .map_err(|e| AppError::FileWrite(format!("Cannot write {}: {}", path.display(), e)))?;

    info!("Wrote {} ({} bytes)", path.display(), file.code.len());
    Ok(path)
}

fn check_file_name(name: &str) -> Result<(), AppError> {
    let plain = Path::new(name).file_name() == Some(OsStr::new(name))
        && !name.contains(['/', '\\'])
        && !name.contains(':');
    if plain {
        Ok(())
    } else {
        Err(AppError::InvalidParams(format!(
            "EA name must be a plain file name, got {:?}",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_code_file_exact_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = CodeFile {
            filename: "MyEA.mq5".to_string(),
            code: "#property strict\n".to_string(),
        };
        let path = write_code_file(&file, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("MyEA.mq5"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "#property strict\n");
    }

    #[test]
    fn test_write_code_file_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("experts");
        let file = CodeFile {
            filename: "EA_Gerado.mq5".to_string(),
            code: String::new(),
        };
        let path = write_code_file(&file, &nested).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_code_file_error_maps_to_file_write() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let file = CodeFile {
            filename: "EA.mq5".to_string(),
            code: String::new(),
        };
        let err = write_code_file(&file, &blocker).unwrap_err();
        assert!(matches!(err, AppError::FileWrite(_)));
    }

    #[test]
    fn test_write_code_file_rejects_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        for name in ["../escaped.mq5", "sub/EA.mq5", "..\\EA.mq5", "/tmp/EA.mq5", "..", "C:EA.mq5"] {
            let file = CodeFile {
                filename: name.to_string(),
                code: "x".to_string(),
            };
            let err = write_code_file(&file, &out).unwrap_err();
            assert!(matches!(err, AppError::InvalidParams(_)), "{}", name);
        }
        assert!(!dir.path().join("escaped.mq5").exists());
        // nothing is created when the name is rejected
        assert!(!out.exists());
    }
}
