//! Predicate compilation errors.

use thiserror::Error;

/// Errors raised while turning a schema document into a predicate.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// The document is not a valid JSON Schema.
    #[error("predicate schema failed to compile")]
    Compile {
        /// Predicate label.
        label: String,
        /// Compiler diagnostic.
        detail: String,
    },
    /// The document root is neither an object nor a boolean.
    #[error("predicate schema root must be an object or boolean")]
    InvalidRoot {
        /// Predicate label.
        label: String,
        /// JSON type found at the root.
        found: &'static str,
    },
}
