//! Scratch directories for tests that write output files.

/// Create a temporary directory for test output.
///
/// The directory is removed when the returned handle is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    temp_test_dir_with_prefix("com-test")
}

/// Create a temporary directory with a specific prefix.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temp directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_used() {
        let dir = temp_test_dir_with_prefix("com-export");
        let name = dir.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("com-export"));
    }

    #[test]
    fn test_temp_dir_is_removed_on_drop() {
        let dir = temp_test_dir();
        let path = dir.path().to_path_buf();
        assert!(path.exists());
        drop(dir);
        assert!(!path.exists());
    }
}
