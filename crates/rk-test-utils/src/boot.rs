//! [`BootFixture`] for tests that need a boot document on disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The boot document used throughout the override examples.
pub const GIN_BOOT: &str = r#"gin:
  - name: greeter
    port: 1949
    commonService:
      enabled: true
  - name: admin
    port: 1950
    commonService:
      enabled: false
logger:
  level: info
  outputs:
    - stdout
    - /var/log/app.log
"#;

/// A temporary directory holding boot documents.
///
/// # Example
///
/// ```rust,no_run
/// use rk_test_utils::boot::{BootFixture, GIN_BOOT};
///
/// let fixture = BootFixture::with_document("boot.yaml", GIN_BOOT);
/// assert!(fixture.path("boot.yaml").is_file());
/// ```
pub struct BootFixture {
    temp_dir: TempDir,
}

impl Default for BootFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl BootFixture {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("BootFixture::new: failed to create temp dir: {e}")),
        }
    }

    /// Create a directory containing one document.
    pub fn with_document(name: &str, content: &str) -> Self {
        let fixture = Self::new();
        fixture.write(name, content);
        fixture
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a file inside the fixture.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write (or overwrite) a document, creating parent directories.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("BootFixture::write: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("BootFixture::write: failed to write {}: {e}", path.display()));
        path
    }
}
