//! Path utilities for safe filesystem operations.

/// Sanitize a string for use as a path component
///
/// Removes path traversal sequences and dangerous characters so organization
/// names and cache identifiers can be used directly as file names.
#[must_use]
pub fn sanitize_path_component(s: &str) -> String {
    // Replace ".." but allow single "." so names like "my.org" survive
    let s = s.replace("..", "__");
    s.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
}
