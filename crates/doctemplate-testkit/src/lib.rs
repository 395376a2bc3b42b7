//! Test utilities for doctemplate
//!
//! This crate provides shared testing utilities used across the doctemplate workspace.

pub mod docx;

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This keeps every file written by tests in a single gitignored location.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use doctemplate_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let template = temp.path().join("_letter.txt");
/// std::fs::write(&template, "Hello !name!").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}
