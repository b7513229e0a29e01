//! Default values and fixed limits.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// HTTP methods an endpoint may declare.
pub const METHODS: [&str; 7] = ["GET", "POST", "PUT", "HEAD", "DELETE", "OPTIONS", "PATCH"];

/// Default output path for `visor init`.
pub const INIT_OUTPUT: &str = "visor.json";

/// Extension appended to exported response files.
pub const EXPORT_EXTENSION: &str = "json";

/// Maximum length in bytes of a sanitized file name.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// File name used when sanitization leaves nothing behind.
pub const PLACEHOLDER_FILE_NAME: &str = "file";

/// Content type for structured (object/array) request bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type for scalar or absent request bodies.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";
