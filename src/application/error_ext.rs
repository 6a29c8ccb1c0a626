//! Error conversion helpers for reading tree inputs
//!
//! Maps `io::Result` onto `ApplicationResult` with the path that was being read.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error. A missing file becomes `InputNotFound`.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read tree", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::InputNotFound(path.to_path_buf()),
            _ => ApplicationError::OperationFailed {
                context: format!("{}: {}", action, path.display()),
                source: Box::new(e),
            },
        })
    }
}
