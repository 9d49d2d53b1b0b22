//! File access used by [`crate::PackageJson`]
//!
//! The controller only needs three primitives, kept behind a trait so tools
//! can point it at something other than the local disk.

use std::io::{self, Write};
use std::path::Path;

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn read_text(&self, path: &Path) -> io::Result<String>;

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The local file system, with atomic writes
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        // Write to a sibling temp file then rename over the target
        let temp_path = path.with_extension("json.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = io::BufWriter::new(file);
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        if let Err(err) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("package.json");

        assert!(!LocalFs.exists(&path));
        LocalFs.write_text(&path, "{}\n")?;
        assert!(LocalFs.exists(&path));
        assert_eq!(LocalFs.read_text(&path)?, "{}\n");
        assert!(!temp_dir.path().join("package.json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_write_replaces_contents() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("package.json");

        LocalFs.write_text(&path, "{\"name\": \"a\"}")?;
        LocalFs.write_text(&path, "{\"name\": \"b\"}")?;
        assert_eq!(LocalFs.read_text(&path)?, "{\"name\": \"b\"}");
        Ok(())
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let result = LocalFs.read_text(Path::new("/definitely/not/here/package.json"));
        assert!(result.is_err_and(|e| e.kind() == io::ErrorKind::NotFound));
    }
}
