//! # clinigate-sanitize
//!
//! Input sanitization for untrusted payloads before they reach business logic,
//! storage, or prompts sent to a language model.
//!
//! The sanitizer is a bounded, best-effort denylist. It removes a handful of
//! well-known injection markers from strings and preserves the shape of the
//! surrounding JSON exactly. It is a defense-in-depth layer: pair it with
//! output encoding at render time and parameterized queries at the storage
//! boundary.
//!
//! ## Example
//!
//! ```rust
//! use clinigate_sanitize::{sanitize_structure, sanitize_text};
//! use serde_json::json;
//!
//! assert_eq!(sanitize_text("  <script>alert(1)</script>hello "), "hello");
//!
//! let body = json!({"notes": ["onerror=x", 12]});
//! let clean = sanitize_structure(body.as_object().unwrap());
//! assert_eq!(clean["notes"], json!(["x", 12]));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod payload;
pub mod structure;
pub mod text;

pub use payload::{SanitizeError, Sanitized};
pub use structure::{sanitize_structure, sanitize_value};
pub use text::{
    sanitize_text, sanitize_text_value, sanitize_text_with_report, Rule, SanitizeReport, MAX_PASSES,
};
