//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::error::{Error, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "File not found: {} (needed for: {purpose})",
            path.display()
        ));
    }

    if !path.is_file() {
        return Err(anyhow::anyhow!(
            "Path is not a file: {} (expected a file for: {purpose})",
            path.display()
        ));
    }

    fs::File::open(path)
        .map_err(Error::IoError)
        .with_context(|| format!("Failed to open {} for: {purpose}", path.display()))
}

/// Check that a directory exists and is readable, with rich error information
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Directory not found: {} (needed for: {purpose})",
            path.display()
        ));
    }

    if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path is not a directory: {} (expected a directory for: {purpose})",
            path.display()
        ));
    }

    // Touch the directory listing to surface permission problems early
    fs::read_dir(path)
        .map(|_| ())
        .map_err(Error::IoError)
        .with_context(|| format!("Failed to access directory {} for: {purpose}", path.display()))
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    std::io::Read::read_to_string(&mut file, &mut content)
        .map_err(Error::IoError)
        .with_context(|| format!("Failed to read {} for: {purpose}", path.display()))?;

    Ok(content)
}
